//! Deterministic tag chip colors.
//!
//! A tag always maps to the same palette entry, so chips keep their color
//! across sessions without storing anything.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Palette used for selected tag chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Red,
    Yellow,
    Green,
    Blue,
    Indigo,
    Purple,
    Pink,
    Gray,
}

impl TagColor {
    pub const PALETTE: [TagColor; 8] = [
        TagColor::Red,
        TagColor::Yellow,
        TagColor::Green,
        TagColor::Blue,
        TagColor::Indigo,
        TagColor::Purple,
        TagColor::Pink,
        TagColor::Gray,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TagColor::Red => "red",
            TagColor::Yellow => "yellow",
            TagColor::Green => "green",
            TagColor::Blue => "blue",
            TagColor::Indigo => "indigo",
            TagColor::Purple => "purple",
            TagColor::Pink => "pink",
            TagColor::Gray => "gray",
        }
    }

    /// 256-color terminal foreground code.
    #[must_use]
    pub fn ansi_code(self) -> u8 {
        match self {
            TagColor::Red => 167,
            TagColor::Yellow => 179,
            TagColor::Green => 107,
            TagColor::Blue => 74,
            TagColor::Indigo => 105,
            TagColor::Purple => 140,
            TagColor::Pink => 175,
            TagColor::Gray => 246,
        }
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the palette color for `tag`.
#[must_use]
pub fn tag_color(tag: &str) -> TagColor {
    let digest = Sha256::digest(tag.as_bytes());
    TagColor::PALETTE[usize::from(digest[0]) % TagColor::PALETTE.len()]
}
