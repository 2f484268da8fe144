//! What an HTML sanitizer must let through for typeset math to survive.
//!
//! This crate does not sanitize.  Feed these lists to whichever sanitizer
//! runs after the fence renderer.

/// Tags and, per tag, the attributes allowed on them.
#[derive(Debug, Clone, Copy)]
pub struct Allowlist {
    /// `(tag, attributes)` pairs.
    pub entries: &'static [(&'static str, &'static [&'static str])],
}

impl Allowlist {
    /// Every allowed tag.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|&(tag, _)| tag)
    }

    /// The attributes allowed on `tag`, or `None` if the tag itself is not
    /// allowed.
    pub fn attributes(&self, tag: &str) -> Option<&'static [&'static str]> {
        self.entries
            .iter()
            .find(|&&(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|&(_, attrs)| attrs)
    }

    /// Whether `attribute` may appear on `tag`.
    pub fn allows(&self, tag: &str, attribute: &str) -> bool {
        self.attributes(tag)
            .map_or(false, |attrs| attrs.iter().any(|a| a.eq_ignore_ascii_case(attribute)))
    }
}

/// Expands to the `(tag, attributes)` entries of [`MATH`], followed by any
/// extra entries given.
macro_rules! math_entries {
    ($($extra:expr),* $(,)?) => {
        &[
            ("pre", &["lang"]),
            ("span", &["class", "style", "aria-hidden"]),
            (
                "svg",
                &["xmlns", "width", "height", "viewBox", "preserveAspectRatio"],
            ),
            ("path", &["d"]),
            $($extra,)*
        ]
    };
}

pub(crate) use math_entries;

/// The block fence wrapper plus the HTML/SVG subset KaTeX emits.
pub const MATH: Allowlist = Allowlist {
    entries: math_entries!(),
};
