//! # linkdeck-core
//!
//! Core types and pure derivations for the linkdeck bookmark manager.
//!
//! This crate defines the foundational types used across all other linkdeck crates:
//! - [`Link`]: a saved bookmark, plus [`NewLink`] and [`LinkPatch`] requests
//! - Canonical ordering ([`sort::apply_pin_and_sort`])
//! - Tag handling, including the reserved `pinned` sentinel ([`tags`])
//! - Derived views: [`LinkFilter`], distinct tags and tag chips ([`filter`])
//! - Deterministic chip colors ([`color`])
//! - Error hierarchy ([`LinkError`], [`ClientError`], [`EditError`])

pub mod color;
pub mod error;
pub mod filter;
pub mod link;
pub mod sort;
pub mod tags;

pub use color::{tag_color, TagColor};
pub use error::{ClientError, EditError, LinkError, Result};
pub use filter::{distinct_tags, tag_chips, toggle_tag, LinkFilter, TagChip, TagChips};
pub use link::{Link, LinkPatch, NewLink};
pub use sort::{apply_pin_and_sort, pinned_count};
pub use tags::{ALL_TAG, PINNED_TAG, UNTAGGED_TAG};
