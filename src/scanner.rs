//! First fencing phase: one linear pass over the source that separates code
//! from prose and records every offset at which a delimiter token begins.
//!
//! Nothing is paired here; see `fence` for that.

use std::ops::Range;

use jetscii::Substring;
use smallvec::SmallVec;

use crate::delimiters::DelimiterSpec;

pub(crate) const CODE_FENCE: &str = "```";

const CODE_ELEMENTS: &[(&str, &str)] = &[("<pre", "</pre>"), ("<code", "</code>")];

pub(crate) struct Scan {
    tokens: SmallVec<[&'static str; 16]>,
    positions: SmallVec<[Vec<usize>; 16]>,

    /// Code regions in source order; never overlapping.
    pub(crate) code: Vec<Range<usize>>,
}

impl Scan {
    /// Sorted start offsets of every occurrence of `token` outside code.
    pub(crate) fn positions(&self, token: &str) -> &[usize] {
        self.tokens
            .iter()
            .position(|&t| t == token)
            .map_or(&[][..], |ix| self.positions[ix].as_slice())
    }
}

pub(crate) fn scan(text: &str, catalog: &[DelimiterSpec]) -> Scan {
    let mut tokens: SmallVec<[&'static str; 16]> = SmallVec::new();
    for d in catalog {
        for &t in &[d.start, d.end] {
            if !t.is_empty() && !tokens.contains(&t) {
                tokens.push(t);
            }
        }
    }

    let mut lead = [false; 256];
    for t in &tokens {
        lead[t.as_bytes()[0] as usize] = true;
    }
    lead[b'`' as usize] = true;
    lead[b'<' as usize] = true;
    lead[b'\\' as usize] = true;

    let mut positions: SmallVec<[Vec<usize>; 16]> = tokens.iter().map(|_| Vec::new()).collect();
    let mut code = Vec::new();

    let bytes = text.as_bytes();
    let size = bytes.len();
    let mut i = 0;

    // Only ASCII lead bytes are ever inspected, so `i` is on a char
    // boundary whenever `text` is sliced below.
    while i < size {
        let b = bytes[i];
        if !lead[b as usize] {
            i += 1;
            continue;
        }

        if b == b'`' && bytes[i..].starts_with(CODE_FENCE.as_bytes()) {
            let body = i + CODE_FENCE.len();
            if let Some(close) = Substring::new(CODE_FENCE).find(&text[body..]) {
                let end = body + close + CODE_FENCE.len();
                code.push(i..end);
                i = end;
                continue;
            }
        }

        if b == b'<' {
            if let Some(end) = code_element_end(text, i) {
                code.push(i..end);
                i = end;
                continue;
            }
        }

        let mut matched = false;
        for (ix, t) in tokens.iter().enumerate() {
            if bytes[i..].starts_with(t.as_bytes()) {
                positions[ix].push(i);
                matched = true;
            }
        }

        // A backslash that isn't a delimiter escapes the next `\` or `$`,
        // as it would in TeX: `\$` is a literal dollar sign.
        if b == b'\\' && !matched && matches!(bytes.get(i + 1), Some(b'\\') | Some(b'$')) {
            i += 2;
            continue;
        }

        i += 1;
    }

    log::trace!(
        "scanned {} bytes: {} code region(s), {} delimiter candidate(s)",
        size,
        code.len(),
        positions.iter().map(Vec::len).sum::<usize>()
    );

    Scan {
        tokens,
        positions,
        code,
    }
}

/// If an HTML `<pre>` or `<code>` element opens at `at`, return the offset
/// just past its closing tag.
fn code_element_end(text: &str, at: usize) -> Option<usize> {
    let rest = &text.as_bytes()[at..];

    for &(open, close) in CODE_ELEMENTS {
        if !rest.starts_with(open.as_bytes()) {
            continue;
        }
        match rest.get(open.len()) {
            Some(b'>') => (),
            Some(c) if c.is_ascii_whitespace() => (),
            _ => continue,
        }
        return Substring::new(close)
            .find(&text[at..])
            .map(|offset| at + offset + close.len());
    }

    None
}
