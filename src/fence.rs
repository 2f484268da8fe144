//! Second fencing phase: pair delimiter candidates into math spans and
//! rewrite each span as a fence marker.
//!
//! A fence marker looks like
//!
//! ```html
//! <pre lang="math" inline><code>x^2</code></pre>
//! ```
//!
//! Document converters pass it through untouched as raw HTML, and the fence
//! renderer later swaps it for typeset output.

use std::ops::Range;

use crate::delimiters::{pairing_order, DelimiterSpec};
use crate::html;
use crate::scanner::{self, Scan, CODE_FENCE};
use crate::{Error, Options};

pub(crate) const MARKER_OPEN: &str = "<pre lang=\"math\"";
pub(crate) const MARKER_INLINE: &str = " inline";

/// A located math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSpan<'t> {
    /// Offset of the opening delimiter.
    pub start_offset: usize,

    /// Offset just past the closing delimiter.
    pub end_offset: usize,

    /// The text between the delimiters, trimmed.  Never empty.
    pub raw_content: &'t str,

    /// Whether the span came from an inline delimiter.
    pub inline: bool,
}

impl<'t> MathSpan<'t> {
    /// The marker that replaces this span.
    pub fn marker(&self) -> FenceMarker<'t> {
        FenceMarker {
            content: self.raw_content,
            inline: self.inline,
        }
    }
}

/// The canonical, converter-opaque form of a math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker<'t> {
    /// Raw math source.
    pub content: &'t str,

    /// Whether the math flows inline.
    pub inline: bool,
}

impl FenceMarker<'_> {
    /// Serialize the marker onto `output`.  When `escape_content` is set the
    /// math source is HTML-escaped; leave it unset if the source text is
    /// already escaped HTML.
    pub fn write_to(&self, output: &mut String, escape_content: bool) {
        output.push_str(MARKER_OPEN);
        if self.inline {
            output.push_str(MARKER_INLINE);
        }
        output.push_str("><code>");
        if escape_content {
            html::escape(output, self.content);
        } else {
            output.push_str(self.content);
        }
        output.push_str("</code></pre>");
    }
}

/// Replace every math span in `raw` with a fence marker.
///
/// ```rust
/// # use texfence::{fence, Options};
/// let fenced = fence("See $$E=mc^2$$ and $x$.", &Options::default()).unwrap();
/// assert_eq!(
///     fenced,
///     "See <pre lang=\"math\"><code>E=mc^2</code></pre> and \
///      <pre lang=\"math\" inline><code>x</code></pre>."
/// );
/// ```
///
/// Returns [`Error::InvalidInput`] for an empty document.  Delimiters with
/// nothing between them, and delimiters that are never closed, stay in the
/// output as literal text.
pub fn fence(raw: &str, options: &Options) -> Result<String, Error> {
    let spans = find_math_spans(raw, options.fence.delimiters)?;

    let mut output = String::with_capacity(raw.len() + spans.len() * 40);
    let mut pos = 0;
    for span in &spans {
        output.push_str(&raw[pos..span.start_offset]);
        span.marker().write_to(&mut output, options.fence.escape_content);
        pos = span.end_offset;
    }
    output.push_str(&raw[pos..]);

    log::debug!(
        "fenced {} math span(s) in a {} byte document",
        spans.len(),
        raw.len()
    );
    Ok(output)
}

/// Locate the math spans of `raw` using `catalog`, in source order.
pub fn find_math_spans<'t>(
    raw: &'t str,
    catalog: &[DelimiterSpec],
) -> Result<Vec<MathSpan<'t>>, Error> {
    if raw.is_empty() {
        return Err(Error::InvalidInput);
    }

    let scan = scanner::scan(raw, catalog);
    let mut pairer = Pairer::new(raw, &scan);
    for spec in pairing_order(catalog) {
        pairer.pair(spec);
    }

    let mut spans = pairer.spans;
    spans.sort_by_key(|s| s.start_offset);
    Ok(spans)
}

struct Pairer<'t, 's> {
    text: &'t str,
    scan: &'s Scan,

    /// Code regions and consumed spans, sorted by start and disjoint.  No
    /// pair may cross one.
    opaque: Vec<Range<usize>>,
    newlines: Vec<usize>,
    spans: Vec<MathSpan<'t>>,
}

impl<'t, 's> Pairer<'t, 's> {
    fn new(text: &'t str, scan: &'s Scan) -> Self {
        Pairer {
            text,
            scan,
            opaque: scan.code.clone(),
            newlines: text.match_indices('\n').map(|(ix, _)| ix).collect(),
            spans: Vec::new(),
        }
    }

    /// Pair the occurrences of one catalog entry.  Each opener takes the
    /// first closer after it.  After a match, or a pair that would cross
    /// opaque text, the search resumes past the closer; after any other
    /// rejected opener it resumes one byte further on.
    fn pair(&mut self, spec: &DelimiterSpec) {
        let scan = self.scan;
        let starts = scan.positions(spec.start);
        let ends = scan.positions(spec.end);
        if starts.is_empty() || ends.is_empty() {
            return;
        }

        let mut cursor = 0;
        loop {
            let Some(&open) = starts.get(starts.partition_point(|&p| p < cursor)) else {
                break;
            };
            let content_start = open + spec.start.len();

            if self.is_opaque(open..content_start)
                || (!spec.inline && self.follows_code_fence(open))
            {
                cursor = open + 1;
                continue;
            }

            let close = ends[ends.partition_point(|&p| p < content_start)..]
                .iter()
                .copied()
                .find(|&p| spec.inline || !self.precedes_code_fence(p + spec.end.len()));
            let Some(close) = close else {
                break;
            };
            let end = close + spec.end.len();

            // A closer on the far side of code or an earlier span is never
            // reused as an opener.
            if self.is_opaque(content_start..end) {
                cursor = end;
                continue;
            }
            if spec.inline && self.crosses_line(content_start..close) {
                cursor = open + 1;
                continue;
            }

            cursor = end;
            let raw_content = self.text[content_start..close].trim();
            if raw_content.is_empty() {
                continue;
            }

            log::trace!(
                "math span {}..{} ({}): {:?}",
                open,
                end,
                if spec.inline { "inline" } else { "block" },
                raw_content
            );
            self.consume(open..end);
            self.spans.push(MathSpan {
                start_offset: open,
                end_offset: end,
                raw_content,
                inline: spec.inline,
            });
        }
    }

    fn is_opaque(&self, range: Range<usize>) -> bool {
        let ix = self.opaque.partition_point(|r| r.end <= range.start);
        self.opaque.get(ix).map_or(false, |r| r.start < range.end)
    }

    fn consume(&mut self, range: Range<usize>) {
        let ix = self.opaque.partition_point(|r| r.start < range.start);
        self.opaque.insert(ix, range);
    }

    fn crosses_line(&self, range: Range<usize>) -> bool {
        let ix = self.newlines.partition_point(|&n| n < range.start);
        self.newlines.get(ix).map_or(false, |&n| n < range.end)
    }

    fn follows_code_fence(&self, offset: usize) -> bool {
        self.text.as_bytes()[..offset].ends_with(CODE_FENCE.as_bytes())
    }

    fn precedes_code_fence(&self, offset: usize) -> bool {
        self.text.as_bytes()[offset..].starts_with(CODE_FENCE.as_bytes())
    }
}
