//! Assertions over generated source text.

use anyhow::{Result, bail};

/// Checks that every needle occurs in `haystack`, each after the previous one.
///
/// # Errors
///
/// Names the first needle that is missing or out of order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) -> Result<()> {
    let mut cursor = 0;
    for needle in needles {
        let Some(rest) = haystack.get(cursor..) else {
            bail!("cursor {cursor} is outside the text");
        };
        let Some(offset) = rest.find(needle) else {
            if haystack.contains(needle) {
                bail!("`{needle}` appears before an earlier needle in:\n{haystack}");
            }
            bail!("`{needle}` is missing from:\n{haystack}");
        };
        cursor += offset + needle.len();
    }
    Ok(())
}

/// Number of non-overlapping occurrences of `needle`.
#[must_use]
pub fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Collapses runs of whitespace into single spaces.
#[must_use]
pub fn squash_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
