//! Sentinel-delimited merge.
//!
//! A document is a generated region ending with the [`SENTINEL`] line,
//! followed by a preserved region of user text that is carried over verbatim
//! on every refresh.

use std::borrow::Cow;

/// Line separating the generated region from the preserved region.
pub const SENTINEL: &str = "<!-- hubnotes:snapshot-end -->";

/// Split `text` after the first line equal to [`SENTINEL`].
///
/// Trailing whitespace on the sentinel line is ignored. Returns the generated
/// region (including the sentinel line and its terminator) and the preserved
/// region, or `None` when no sentinel line exists.
#[must_use]
pub fn split(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let end = offset.saturating_add(line.len());
        if line.trim_end() == SENTINEL {
            return Some((text.get(..end)?, text.get(end..)?));
        }
        offset = end;
    }
    None
}

/// Make sure rendered output carries the sentinel and ends it with a newline.
#[must_use]
pub fn with_sentinel(rendered: &str) -> Cow<'_, str> {
    match split(rendered) {
        Some((generated, _)) if generated.ends_with('\n') => Cow::Borrowed(rendered),
        Some(_) => Cow::Owned(format!("{rendered}\n")),
        None => {
            let mut out = rendered.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(SENTINEL);
            out.push('\n');
            Cow::Owned(out)
        }
    }
}

/// Combine fresh `rendered` output with the preserved region of `existing`.
///
/// Without a sentinel in `existing` the result is `rendered` alone. With one,
/// the generated region of `rendered` is followed by the preserved region of
/// `existing`, byte for byte.
#[must_use]
pub fn splice(existing: &str, rendered: &str) -> String {
    let rendered = with_sentinel(rendered);
    let Some((_, preserved)) = split(existing) else {
        return rendered.into_owned();
    };
    let generated = split(&rendered).map_or(rendered.as_ref(), |(generated, _)| generated);

    let mut out = String::with_capacity(generated.len().saturating_add(preserved.len()));
    out.push_str(generated);
    out.push_str(preserved);
    out
}

/// Render `snapshot` and splice it into `existing`. Performs no I/O.
pub fn merge<S, F, E>(existing: &str, snapshot: &S, render: F) -> Result<String, E>
where
    S: ?Sized,
    F: FnOnce(&S) -> Result<String, E>,
{
    let rendered = render(snapshot)?;
    Ok(splice(existing, &rendered))
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
