//! Plain-text documents.
//!
//! The text is escaped, its math fenced and typeset, and line breaks become
//! `<br>`.

use crate::adapters::TypesetterAdapter;
use crate::allowlist::{math_entries, Allowlist};
use crate::fence::fence;
use crate::html;
use crate::render::{render_fences, RenderOutcome};
use crate::{Error, Options};

/// What a sanitizer must allow for rendered plain text: the math subset
/// plus `br`.
pub const ALLOWLIST: Allowlist = Allowlist {
    entries: math_entries!(("br", &[])),
};

/// Render a plain-text document with math.
///
/// The escaping happens before fencing, so `options.fence.escape_content`
/// is ignored: the math source inside fences is already escaped.
pub fn render(
    raw: &str,
    options: &Options,
    typesetter: &dyn TypesetterAdapter,
) -> Result<RenderOutcome, Error> {
    if raw.is_empty() {
        return Err(Error::InvalidInput);
    }

    let escaped = html::escape_to_string(raw);

    let mut options = options.clone();
    options.fence.escape_content = false;
    let fenced = fence(&escaped, &options)?;

    let mut outcome = render_fences(&fenced, &options, typesetter)?;
    outcome.html = outcome.html.replace('\n', "<br>");
    Ok(outcome)
}
