//! Typeset TeX math in README-style documents.
//!
//! Math is handled in two passes around whatever turns the document into
//! HTML:
//!
//! 1. [`fence`] finds math delimited by `$…$`, `$$…$$`, `\(…\)`, `\[…\]`,
//!    `` $`…`$ `` or a `\begin{…}` environment, and rewrites each span into a
//!    fence marker, `<pre lang="math"><code>…</code></pre>`, that markdown
//!    and rst converters pass through as raw HTML.  Text inside code fences
//!    and `<pre>`/`<code>` elements is left alone.
//! 2. [`render_fences`] finds the markers in the converted HTML and asks a
//!    typesetting engine for each one.  Expressions the engine rejects are
//!    dropped and reported as [`Diagnostic`]s; the rest of the document is
//!    always rendered.
//!
//! ```rust
//! use texfence::{fence, render_fences, EngineError, Options, TypesetOptions,
//!                TypesetSession, TypesetterAdapter};
//!
//! struct Echo;
//!
//! impl TypesetSession for Echo {
//!     fn render_to_string(&mut self, source: &str, opts: &TypesetOptions)
//!         -> Result<String, EngineError> {
//!         Ok(format!("<span class=\"katex\" data-display=\"{}\">{}</span>",
//!                    opts.display_mode, source))
//!     }
//! }
//!
//! impl TypesetterAdapter for Echo {
//!     fn begin(&self) -> Result<Box<dyn TypesetSession + '_>, texfence::Error> {
//!         Ok(Box::new(Echo))
//!     }
//! }
//!
//! let options = Options::default();
//! let fenced = fence("Euler: $e^{i\\pi}+1=0$", &options).unwrap();
//! let outcome = render_fences(&fenced, &options, &Echo).unwrap();
//! assert_eq!(outcome.html,
//!            "Euler: <span class=\"katex\" data-display=\"false\">e^{i\\pi}+1=0</span>");
//! assert!(outcome.is_clean());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]
#![allow(unknown_lints, clippy::doc_markdown, clippy::new_without_default)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adapters;
pub mod allowlist;
mod converter;
pub mod delimiters;
mod entity;
mod error;
mod fence;
mod html;
mod options;
mod render;
mod scanner;
pub mod txt;

pub mod plugins {
    //! Typesetting engines.

    #[cfg(feature = "quickjs")]
    #[cfg_attr(docsrs, doc(cfg(feature = "quickjs")))]
    pub mod quickjs;
}

pub use adapters::{
    DocumentConverter, EngineError, OutputFormat, StackFrame, TypesetOptions, TypesetSession,
    TypesetterAdapter,
};
pub use converter::CommandConverter;
pub use delimiters::{DelimiterSpec, DEFAULT_DELIMITERS};
pub use error::Error;
pub use fence::{fence, find_math_spans, FenceMarker, MathSpan};
pub use options::{FenceOptions, Options, RenderOptions};
#[cfg(feature = "bon")]
pub use options::{FenceOptionsBuilder, RenderOptionsBuilder};
pub use render::{render_fences, Diagnostic, RenderOutcome};

/// Run the whole pipeline: fence `raw`, convert it with `converter`, then
/// typeset the fences.
pub fn render_document(
    raw: &str,
    options: &Options,
    converter: &dyn DocumentConverter,
    typesetter: &dyn TypesetterAdapter,
) -> Result<RenderOutcome, Error> {
    let fenced = fence(raw, options)?;
    let converted = converter.convert(&fenced)?;
    render_fences(&converted, options, typesetter)
}
