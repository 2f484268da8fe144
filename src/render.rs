//! The fence renderer: find fence markers in converted HTML and replace each
//! with typeset output.

use std::fmt;

use jetscii::Substring;

use crate::adapters::{EngineError, TypesetOptions, TypesetSession, TypesetterAdapter};
use crate::entity;
use crate::fence::{MARKER_INLINE, MARKER_OPEN};
use crate::{Error, Options};

const CODE_OPEN: &str = "<code";
const CODE_CLOSE: &str = "</code>";
const PRE_CLOSE: &str = "</pre>";

const ANONYMOUS: &str = "<anonymous>";

/// A non-fatal report about one expression that could not be typeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error class and originating function, e.g. `ParseError in parse`.
    pub summary: String,

    /// The engine's message, without stack frames.
    pub detail: String,
}

impl From<&EngineError> for Diagnostic {
    fn from(err: &EngineError) -> Self {
        let first = err.frames.first();
        let class = first.map_or("Error", |f| error_class(&f.message));
        let function = err
            .frames
            .last()
            .and_then(|f| function_name(&f.context))
            .unwrap_or(ANONYMOUS);

        Diagnostic {
            summary: format!("{} in {}", class, function),
            detail: first.map(|f| strip_stack_lines(&f.message)).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            f.write_str(&self.summary)
        } else {
            write!(f, "{}: {}", self.summary, self.detail)
        }
    }
}

/// A rendered document and the diagnostics gathered while rendering it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// The whole document, with every fence replaced.
    pub html: String,

    /// One entry per expression that failed, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutcome {
    /// Whether every expression was typeset.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Replace every fence marker in `html` with typeset math.
///
/// `options.render.strict` asks the engine to reject malformed TeX rather
/// than render it best-effort.  Rejected expressions are dropped from the
/// document and reported in [`RenderOutcome::diagnostics`]; they never
/// abort the render.  Fails with [`Error::InvalidInput`] for an empty
/// document and with [`Error::EngineUnavailable`] when the typesetter cannot
/// start.
pub fn render_fences(
    html: &str,
    options: &Options,
    typesetter: &dyn TypesetterAdapter,
) -> Result<RenderOutcome, Error> {
    if html.is_empty() {
        return Err(Error::InvalidInput);
    }

    let Some(first) = next_marker(html, 0) else {
        return Ok(RenderOutcome {
            html: html.to_string(),
            diagnostics: Vec::new(),
        });
    };

    let mut renderer = FenceRenderer {
        session: typesetter.begin()?,
        strict: options.render.strict,
        output: String::with_capacity(html.len() * 2),
        diagnostics: Vec::new(),
        rendered: 0,
    };

    let mut pos = 0;
    let mut marker = Some(first);
    while let Some(m) = marker {
        renderer.output.push_str(&html[pos..m.start]);
        renderer.render(&m);
        pos = m.end;
        marker = next_marker(html, pos);
    }
    renderer.output.push_str(&html[pos..]);

    log::debug!(
        "rendered {} fence(s), {} failed",
        renderer.rendered,
        renderer.diagnostics.len()
    );

    Ok(RenderOutcome {
        html: renderer.output,
        diagnostics: renderer.diagnostics,
    })
}

struct FenceRenderer<'t> {
    session: Box<dyn TypesetSession + 't>,
    strict: bool,
    output: String,
    diagnostics: Vec<Diagnostic>,
    rendered: usize,
}

impl FenceRenderer<'_> {
    fn render(&mut self, marker: &Marker<'_>) {
        let source = entity::unescape_html(marker.content);
        let source = source.trim();
        if source.is_empty() {
            log::trace!("dropping empty fence at {}", marker.start);
            return;
        }

        let options = TypesetOptions::for_fence(marker.inline, self.strict);
        match self.session.render_to_string(source, &options) {
            Ok(fragment) => {
                if marker.inline {
                    self.output.push_str(&fragment);
                } else {
                    self.output.push_str(MARKER_OPEN);
                    self.output.push('>');
                    self.output.push_str(&fragment);
                    self.output.push_str(PRE_CLOSE);
                }
                self.rendered += 1;
            }
            Err(err) => {
                let diagnostic = Diagnostic::from(&err);
                log::warn!("could not typeset {:?}: {}", source, diagnostic.summary);
                self.diagnostics.push(diagnostic);
            }
        }
    }
}

struct Marker<'h> {
    start: usize,
    end: usize,
    inline: bool,
    content: &'h str,
}

fn next_marker(html: &str, from: usize) -> Option<Marker<'_>> {
    let finder = Substring::new(MARKER_OPEN);
    let mut pos = from;

    while let Some(offset) = finder.find(&html[pos..]) {
        let start = pos + offset;
        if let Some(marker) = parse_marker(html, start) {
            return Some(marker);
        }
        pos = start + MARKER_OPEN.len();
    }

    None
}

/// Parse `<pre lang="math"[ inline]> <code…>CONTENT</code> </pre>` at
/// `start`.
fn parse_marker(html: &str, start: usize) -> Option<Marker<'_>> {
    let bytes = html.as_bytes();
    let mut i = start + MARKER_OPEN.len();

    let inline = bytes[i..].starts_with(MARKER_INLINE.as_bytes());
    if inline {
        i += MARKER_INLINE.len();
    }
    if bytes.get(i) != Some(&b'>') {
        return None;
    }
    i = skip_whitespace(bytes, i + 1);

    if !bytes[i..].starts_with(CODE_OPEN.as_bytes()) {
        return None;
    }
    i += CODE_OPEN.len();
    match bytes.get(i) {
        Some(b'>') => (),
        Some(c) if c.is_ascii_whitespace() => (),
        _ => return None,
    }
    let content_start = i + html[i..].find('>')? + 1;

    let content_end = content_start + Substring::new(CODE_CLOSE).find(&html[content_start..])?;
    let i = skip_whitespace(bytes, content_end + CODE_CLOSE.len());
    if !bytes[i..].starts_with(PRE_CLOSE.as_bytes()) {
        return None;
    }

    Some(Marker {
        start,
        end: i + PRE_CLOSE.len(),
        inline,
        content: &html[content_start..content_end],
    })
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn error_class(message: &str) -> &str {
    let class = message.split(':').next().unwrap_or("").trim();
    let is_identifier = !class.is_empty()
        && message.contains(':')
        && class
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
    if is_identifier {
        class
    } else {
        "Error"
    }
}

fn function_name(context: &str) -> Option<&str> {
    let context = context.trim();
    let context = context.strip_prefix("at ").unwrap_or(context);
    let name = match context.find(" (") {
        Some(ix) => &context[..ix],
        None => context,
    };
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn strip_stack_lines(message: &str) -> String {
    message
        .lines()
        .filter(|line| !line.trim_start().starts_with("at "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
