//! HTML character reference decoding for fence contents.

use std::char;
use std::cmp::min;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

const MAX_NUMERIC_DIGITS: usize = 8;

/// Decode the character reference at the start of `text`, which is the
/// input just past an `&`.  Returns the decoded characters and the number
/// of bytes consumed, including the trailing `;`.
pub fn unescape(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();

    if bytes.len() >= 3 && bytes[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i;

        let num_digits = if bytes[1].is_ascii_digit() {
            i = 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                codepoint = (codepoint * 10) + (bytes[i] - b'0') as u32;
                codepoint = min(codepoint, 0x110000);
                i += 1;
            }
            i - 1
        } else if bytes[1] == b'x' || bytes[1] == b'X' {
            i = 2;
            while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                codepoint = (codepoint * 16) + (bytes[i] as char).to_digit(16).unwrap_or(0);
                codepoint = min(codepoint, 0x110000);
                i += 1;
            }
            i - 2
        } else {
            return None;
        };

        if (1..=MAX_NUMERIC_DIGITS).contains(&num_digits) && i < bytes.len() && bytes[i] == b';' {
            let decoded = match codepoint {
                0 | 0xD800..=0xDFFF | 0x110000.. => '\u{FFFD}',
                _ => char::from_u32(codepoint).unwrap_or('\u{FFFD}'),
            };
            return Some((decoded.to_string(), i + 1));
        }

        return None;
    }

    let size = min(bytes.len(), entitydata::MAX_NAME_LENGTH + 1);
    for i in 1..size {
        match bytes[i] {
            b';' => return lookup(&text[..i]).map(|e| (e.to_string(), i + 1)),
            b if b.is_ascii_alphanumeric() => continue,
            _ => return None,
        }
    }

    None
}

fn lookup(name: &str) -> Option<&'static str> {
    entitydata::NAMED_ENTITIES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|ix| entitydata::NAMED_ENTITIES[ix].1)
}

/// Decode every character reference in `src`.  Ampersands that do not
/// start a valid reference are kept as-is.
pub fn unescape_html(src: &str) -> String {
    let size = src.len();
    let mut i = 0;
    let mut v = String::with_capacity(size);

    while i < size {
        let org = i;
        match src[i..].find('&') {
            Some(offset) => i += offset,
            None => i = size,
        }

        if i > org {
            if org == 0 && i >= size {
                return src.to_string();
            }
            v.push_str(&src[org..i]);
        }

        if i >= size {
            return v;
        }

        i += 1;
        match unescape(&src[i..]) {
            Some((chs, consumed)) => {
                v.push_str(&chs);
                i += consumed;
            }
            None => v.push('&'),
        }
    }

    v
}
