//! Adapter traits for the collaborators around the pipeline.
//!
//! A typesetting engine plugs in through [`TypesetterAdapter`]; the document
//! converter that runs between fencing and fence rendering plugs in through
//! [`DocumentConverter`].

use std::fmt;

use crate::Error;

/// Implement this adapter to provide a typesetting engine.
///
/// The fence renderer calls [`TypesetterAdapter::begin`] once per document
/// and drops the returned session when the document is done, whether or not
/// individual expressions failed.  A session is never shared between
/// documents or threads.
pub trait TypesetterAdapter {
    /// Acquire a fresh execution context.
    ///
    /// Failing here means no math can be rendered at all; report it as
    /// [`Error::EngineUnavailable`].
    fn begin(&self) -> Result<Box<dyn TypesetSession + '_>, Error>;
}

/// A live typesetting context, scoped to one document.
pub trait TypesetSession {
    /// Typeset `source` into an HTML fragment.
    fn render_to_string(
        &mut self,
        source: &str,
        options: &TypesetOptions,
    ) -> Result<String, EngineError>;
}

/// The markup the engine is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Visual HTML only.
    Html,
    /// MathML only.
    Mathml,
    /// HTML plus hidden MathML for accessibility.
    HtmlAndMathml,
}

impl OutputFormat {
    /// The name the engine uses for this format.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Mathml => "mathml",
            OutputFormat::HtmlAndMathml => "htmlAndMathml",
        }
    }
}

/// Options passed with every typesetting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypesetOptions {
    /// Report malformed TeX as an error instead of rendering it best-effort.
    pub throw_on_error: bool,

    /// Left-align display equations.
    pub fleqn: bool,

    /// Typeset as a display (block) equation.
    pub display_mode: bool,

    /// Requested markup.
    pub output: OutputFormat,
}

impl TypesetOptions {
    /// The options the fence renderer uses for a fence.
    pub fn for_fence(inline: bool, strict: bool) -> Self {
        TypesetOptions {
            throw_on_error: strict,
            fleqn: false,
            display_mode: !inline,
            output: OutputFormat::Html,
        }
    }
}

/// One frame of an engine error trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackFrame {
    /// What went wrong, as the engine reports it.
    pub message: String,

    /// Where: typically `at function (location)`.
    pub context: String,
}

/// A failure reported by the engine for one expression.
///
/// The first frame is the originating error, the last is the outermost
/// call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineError {
    /// Frames, innermost first.
    pub frames: Vec<StackFrame>,
}

impl EngineError {
    /// An error with a single frame.
    pub fn new(message: impl Into<String>, context: impl Into<String>) -> Self {
        EngineError {
            frames: vec![StackFrame {
                message: message.into(),
                context: context.into(),
            }],
        }
    }

    /// Append an outer frame.
    pub fn with_frame(mut self, message: impl Into<String>, context: impl Into<String>) -> Self {
        self.frames.push(StackFrame {
            message: message.into(),
            context: context.into(),
        });
        self
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frames.first() {
            Some(frame) => f.write_str(&frame.message),
            None => f.write_str("typesetting failed"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Implement this adapter to convert fenced source into HTML (a markdown or
/// reStructuredText renderer, say).  Fence markers must come out as they
/// went in, apart from HTML-escaping of their text.
///
/// Any `Fn(&str) -> String` is a converter.
pub trait DocumentConverter {
    /// Convert `fenced` to HTML.
    fn convert(&self, fenced: &str) -> Result<String, Error>;
}

impl<F> DocumentConverter for F
where
    F: Fn(&str) -> String,
{
    fn convert(&self, fenced: &str) -> Result<String, Error> {
        Ok(self(fenced))
    }
}
