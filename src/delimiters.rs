//! The catalog of math delimiters the fencer recognises.

/// A pair of tokens enclosing a math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSpec {
    /// The opening token, e.g. `$$` or `\begin{align}`.
    pub start: &'static str,

    /// The closing token.  Equal to `start` for symmetric delimiters such as
    /// `$`.
    pub end: &'static str,

    /// Whether the expression flows within a line of text.  Block-level
    /// entries may span lines and are paired before any inline entry.
    pub inline: bool,
}

impl DelimiterSpec {
    /// A block-level (display) delimiter pair.
    pub const fn block(start: &'static str, end: &'static str) -> Self {
        DelimiterSpec {
            start,
            end,
            inline: false,
        }
    }

    /// An inline delimiter pair.
    pub const fn inline(start: &'static str, end: &'static str) -> Self {
        DelimiterSpec {
            start,
            end,
            inline: true,
        }
    }
}

/// The default catalog.
///
/// Order matters: `$$` must come before `$` and `` $` `` before `$`, or
/// the shorter token would claim half of the longer one.
pub static DEFAULT_DELIMITERS: &[DelimiterSpec] = &[
    DelimiterSpec::block("$$", "$$"),
    DelimiterSpec::block("\\begin{equation}", "\\end{equation}"),
    DelimiterSpec::block("\\begin{align}", "\\end{align}"),
    DelimiterSpec::block("\\begin{alignat}", "\\end{alignat}"),
    DelimiterSpec::block("\\begin{gather}", "\\end{gather}"),
    DelimiterSpec::block("\\begin{CD}", "\\end{CD}"),
    DelimiterSpec::block("\\[", "\\]"),
    DelimiterSpec::inline("\\(", "\\)"),
    DelimiterSpec::inline("$`", "`$"),
    DelimiterSpec::inline("$", "$"),
];

/// Iterate `catalog` in pairing order: block entries first, then inline
/// entries, each class in catalog order.
pub(crate) fn pairing_order(
    catalog: &[DelimiterSpec],
) -> impl Iterator<Item = &DelimiterSpec> + '_ {
    catalog
        .iter()
        .filter(|d| !d.inline)
        .chain(catalog.iter().filter(|d| d.inline))
}
