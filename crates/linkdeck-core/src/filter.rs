//! Derived views over a link collection: text/tag filtering, the distinct
//! tag list and the tag selector chips.

use std::collections::HashSet;

use serde::Serialize;

use crate::color::{tag_color, TagColor};
use crate::link::Link;
use crate::tags::ALL_TAG;

/// Search criteria for the visible link list.
///
/// Tag selection is an OR over the selected tags; the text query is a
/// case-insensitive substring match on title, url or any tag. The two
/// compose with AND and empty criteria let everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    pub query: String,
    pub tags: Vec<String>,
}

impl LinkFilter {
    #[must_use]
    pub fn new(query: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            query: query.into(),
            tags,
        }
    }

    /// True when neither criterion restricts the view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.query.trim().is_empty()
    }

    #[must_use]
    pub fn matches(&self, link: &Link) -> bool {
        self.matches_tags(link) && matches_query(link, &self.normalized_query())
    }

    /// Apply the filter, preserving input order.
    #[must_use]
    pub fn apply<'a>(&self, links: &'a [Link]) -> Vec<&'a Link> {
        let query = self.normalized_query();
        links
            .iter()
            .filter(|link| self.matches_tags(link) && matches_query(link, &query))
            .collect()
    }

    fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    fn matches_tags(&self, link: &Link) -> bool {
        self.tags.is_empty() || link.tags.iter().any(|t| self.tags.contains(t))
    }
}

fn matches_query(link: &Link, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    link.title.to_lowercase().contains(query)
        || link.url.to_lowercase().contains(query)
        || link.tags.iter().any(|t| t.to_lowercase().contains(query))
}

/// All tags across `links`, deduplicated in first-seen order.
#[must_use]
pub fn distinct_tags(links: &[Link]) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .flat_map(|l| l.tags.iter())
        .filter(|t| seen.insert(t.as_str()))
        .cloned()
        .collect()
}

/// One chip in the tag selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub tag: String,
    /// Links in the whole collection carrying this tag.
    pub count: usize,
    pub selected: bool,
    pub color: TagColor,
}

/// The tag selector row: the pseudo `all` chip followed by one chip per tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChips {
    pub all_selected: bool,
    pub all_color: TagColor,
    pub chips: Vec<TagChip>,
}

/// Build the selector chips for `links` given the current selection.
#[must_use]
pub fn tag_chips(links: &[Link], selected: &[String]) -> TagChips {
    let chips = distinct_tags(links)
        .into_iter()
        .map(|tag| TagChip {
            count: links.iter().filter(|l| l.has_tag(&tag)).count(),
            selected: selected.contains(&tag),
            color: tag_color(&tag),
            tag,
        })
        .collect();

    TagChips {
        all_selected: selected.is_empty(),
        all_color: tag_color(ALL_TAG),
        chips,
    }
}

/// Selection after clicking `tag` in the selector.
///
/// The selector is single-select: clicking an unselected tag selects only that
/// tag, clicking the selected tag (or `all`) clears the selection.
#[must_use]
pub fn toggle_tag(selected: &[String], tag: &str) -> Vec<String> {
    if tag == ALL_TAG || selected.iter().any(|t| t == tag) {
        Vec::new()
    } else {
        vec![tag.to_string()]
    }
}
