//! Configuration for the fencer and the fence renderer.

#[cfg(feature = "bon")]
use bon::Builder;

use crate::delimiters::{DelimiterSpec, DEFAULT_DELIMITERS};

#[derive(Default, Debug, Clone)]
/// Umbrella options struct.
pub struct Options<'c> {
    /// Configure how math is located and fenced.
    pub fence: FenceOptions<'c>,

    /// Configure how fences are typeset.
    pub render: RenderOptions,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for the delimiter fencer.
pub struct FenceOptions<'c> {
    /// The delimiter catalog.  Block entries are always paired before inline
    /// ones; within a class, earlier entries win.
    ///
    /// ```rust
    /// # use texfence::{fence, DelimiterSpec, Options};
    /// static ONLY_PARENS: &[DelimiterSpec] = &[DelimiterSpec::inline("\\(", "\\)")];
    ///
    /// let mut options = Options::default();
    /// options.fence.delimiters = ONLY_PARENS;
    /// assert_eq!(fence("$5 or \\(x\\)", &options).unwrap(),
    ///            "$5 or <pre lang=\"math\" inline><code>x</code></pre>");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = DEFAULT_DELIMITERS))]
    pub delimiters: &'c [DelimiterSpec],

    /// HTML-escape math source inside fence markers.  Turn this off when the
    /// text being fenced is already escaped HTML.
    ///
    /// ```rust
    /// # use texfence::{fence, Options};
    /// let mut options = Options::default();
    /// assert_eq!(fence("$a<b$", &options).unwrap(),
    ///            "<pre lang=\"math\" inline><code>a&lt;b</code></pre>");
    /// options.fence.escape_content = false;
    /// assert_eq!(fence("$a &lt; b$", &options).unwrap(),
    ///            "<pre lang=\"math\" inline><code>a &lt; b</code></pre>");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub escape_content: bool,
}

impl Default for FenceOptions<'_> {
    fn default() -> Self {
        FenceOptions {
            delimiters: DEFAULT_DELIMITERS,
            escape_content: true,
        }
    }
}

#[derive(Default, Debug, Clone, Copy)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Options for the fence renderer.
pub struct RenderOptions {
    /// Ask the engine to reject malformed TeX.  Rejected expressions are
    /// dropped and reported as diagnostics; otherwise the engine renders
    /// what it can, usually highlighting the error inline.
    #[cfg_attr(feature = "bon", builder(default))]
    pub strict: bool,
}
