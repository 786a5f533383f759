//! Tag helpers.
//!
//! Tags are free-form strings stored directly on each link. Two kinds of
//! names are special:
//! - [`PINNED_TAG`] is persisted and encodes pin status.
//! - [`ALL_TAG`] and [`UNTAGGED_TAG`] exist only in the tag selector and are
//!   never stored on a link.

use std::collections::HashSet;

use crate::error::LinkError;

/// Reserved tag that marks a link as pinned.
pub const PINNED_TAG: &str = "pinned";

/// Selector pseudo tag meaning "no tag filter".
pub const ALL_TAG: &str = "all";

/// Selector pseudo tag for links without tags.
pub const UNTAGGED_TAG: &str = "untagged";

/// Whether `tag` is a selector-only pseudo tag.
#[must_use]
pub fn is_pseudo_tag(tag: &str) -> bool {
    tag == ALL_TAG || tag == UNTAGGED_TAG
}

/// Deduplicate tags, keeping the first occurrence of each.
#[must_use]
pub fn dedup_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.as_ref())
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Trim, drop empties and deduplicate user-entered tags.
///
/// # Errors
///
/// Returns [`LinkError::ReservedTag`] if a selector pseudo tag is present.
pub fn normalize_tags<I, S>(tags: I) -> Result<Vec<String>, LinkError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            continue;
        }
        if is_pseudo_tag(tag) {
            return Err(LinkError::ReservedTag(tag.to_string()));
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    Ok(out)
}

/// Parse a comma separated tag list such as `"rust, tools,cli"`.
///
/// # Errors
///
/// See [`normalize_tags`].
pub fn parse_tag_list(input: &str) -> Result<Vec<String>, LinkError> {
    normalize_tags(input.split(','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_list_trims_and_dedups() {
        let tags = parse_tag_list(" rust, cli ,,rust,tools ").unwrap();
        assert_eq!(tags, vec!["rust", "cli", "tools"]);
    }

    #[test]
    fn pseudo_tags_are_rejected() {
        assert!(matches!(
            parse_tag_list("work, all"),
            Err(LinkError::ReservedTag(t)) if t == "all"
        ));
        assert!(normalize_tags(["untagged"]).is_err());
    }

    #[test]
    fn pinned_is_a_regular_persisted_tag() {
        assert_eq!(parse_tag_list("pinned").unwrap(), vec!["pinned"]);
        assert!(!is_pseudo_tag(PINNED_TAG));
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        assert_eq!(dedup_tags(&["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }
}
