//! Canonical ordering of a link collection.

use crate::link::Link;

/// Sort links into canonical order: pinned links first, then newest first.
///
/// The sort is stable, so links with equal pin status and creation time keep
/// their relative order. Applying it to an already sorted slice is a no-op.
pub fn apply_pin_and_sort(links: &mut [Link]) {
    links.sort_by(|a, b| {
        b.is_pinned()
            .cmp(&a.is_pinned())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Number of pinned links in a view. In canonical order these form a prefix.
#[must_use]
pub fn pinned_count(links: &[Link]) -> usize {
    links.iter().filter(|l| l.is_pinned()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn link(id: &str, day: u32, pinned: bool) -> Link {
        Link {
            id: id.to_string(),
            url: format!("{id}.com"),
            title: id.to_uppercase(),
            tags: if pinned {
                vec!["pinned".to_string()]
            } else {
                vec![]
            },
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            visited_at: None,
        }
    }

    fn ids(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn pinned_first_then_newest() {
        let mut links = vec![
            link("a", 1, false),
            link("b", 5, false),
            link("c", 2, true),
            link("d", 9, true),
        ];
        apply_pin_and_sort(&mut links);
        assert_eq!(ids(&links), vec!["d", "c", "b", "a"]);
        assert_eq!(pinned_count(&links), 2);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let mut links = vec![link("x", 3, false), link("y", 3, false), link("z", 3, false)];
        apply_pin_and_sort(&mut links);
        assert_eq!(ids(&links), vec!["x", "y", "z"]);
    }

    #[test]
    fn pinning_keeps_earlier_pinned_links_in_place() {
        let mut links = vec![link("p1", 8, true), link("p2", 2, true), link("n", 5, false)];
        apply_pin_and_sort(&mut links);
        let n = links.iter_mut().find(|l| l.id == "n").unwrap();
        n.tags = n.pinned_tags();
        apply_pin_and_sort(&mut links);
        assert_eq!(ids(&links), vec!["p1", "n", "p2"]);
        let before: Vec<_> = ids(&links).into_iter().filter(|id| *id != "n").collect();
        assert_eq!(before, vec!["p1", "p2"]);
    }

    proptest! {
        #[test]
        fn canonical_sort_is_idempotent(
            entries in proptest::collection::vec((1u32..28, any::<bool>()), 0..24)
        ) {
            let mut links: Vec<Link> = entries
                .iter()
                .enumerate()
                .map(|(i, (day, pinned))| link(&format!("l{i}"), *day, *pinned))
                .collect();
            apply_pin_and_sort(&mut links);
            let once = links.clone();
            apply_pin_and_sort(&mut links);
            prop_assert_eq!(once, links);
        }

        #[test]
        fn pinned_links_form_a_prefix(
            entries in proptest::collection::vec((1u32..28, any::<bool>()), 0..24)
        ) {
            let mut links: Vec<Link> = entries
                .iter()
                .enumerate()
                .map(|(i, (day, pinned))| link(&format!("l{i}"), *day, *pinned))
                .collect();
            apply_pin_and_sort(&mut links);
            let count = pinned_count(&links);
            prop_assert!(links[..count].iter().all(Link::is_pinned));
            prop_assert!(!links[count..].iter().any(Link::is_pinned));
        }
    }
}
