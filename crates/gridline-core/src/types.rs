//! Core value types shared by the layout engine and its hosts.

use std::fmt;

/// A color value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// A gray with the given white level.
    pub const fn white(level: f32, alpha: f32) -> Self {
        Self::rgba(level, level, level, alpha)
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF5733").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::from_rgb8(r, g, b))
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const CLEAR: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Identifies a section in the flattened layout.
///
/// `Global` is the sentinel for the app-wide section that is laid out ahead
/// of every regular section and whose headers pin independently of scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionIndex {
    Global,
    At(usize),
}

impl SectionIndex {
    pub fn is_global(self) -> bool {
        matches!(self, SectionIndex::Global)
    }

    /// The regular section position, if this is not the global section.
    pub fn position(self) -> Option<usize> {
        match self {
            SectionIndex::Global => None,
            SectionIndex::At(index) => Some(index),
        }
    }
}

impl From<usize> for SectionIndex {
    fn from(index: usize) -> Self {
        SectionIndex::At(index)
    }
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionIndex::Global => f.write_str("global"),
            SectionIndex::At(index) => write!(f, "{index}"),
        }
    }
}

/// A `(section, item)` coordinate.
///
/// For cells `item` is the item index within the section; for supplementary
/// elements and decorations it is the index within the element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    pub section: SectionIndex,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: impl Into<SectionIndex>, item: usize) -> Self {
        Self { section: section.into(), item }
    }

    pub fn global(item: usize) -> Self {
        Self { section: SectionIndex::Global, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// Horizontal order in which cells fill the columns of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemLayoutOrder {
    #[default]
    LeadingToTrailing,
    TrailingToLeading,
}

/// Element kinds used for supplementary items and decorations.
pub mod kinds {
    pub const SECTION_HEADER: &str = "section-header";
    pub const SECTION_FOOTER: &str = "section-footer";
    pub const LEFT_AUXILIARY_ITEM: &str = "left-auxiliary-item";
    pub const RIGHT_AUXILIARY_ITEM: &str = "right-auxiliary-item";
    pub const PLACEHOLDER: &str = "placeholder";

    pub const ROW_SEPARATOR: &str = "row-separator";
    pub const COLUMN_SEPARATOR: &str = "column-separator";
    pub const SECTION_SEPARATOR: &str = "section-separator";
    pub const GLOBAL_HEADER_BACKGROUND: &str = "global-header-background";
    pub const CONTENT_BACKGROUND: &str = "content-background";
}

/// Draw order channels.
pub mod z_index {
    pub const DEFAULT: i32 = 1;
    pub const SUPPLEMENTARY: i32 = 10;
    pub const SEPARATOR: i32 = 100;
    pub const PINNED_HEADER: i32 = 1000;
    pub const SECTION_SEPARATOR: i32 = 2000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_index_ordering() {
        assert!(SectionIndex::Global < SectionIndex::At(0));
        assert!(SectionIndex::At(1) < SectionIndex::At(2));
        assert_eq!(SectionIndex::At(3).position(), Some(3));
        assert_eq!(SectionIndex::Global.position(), None);
    }

    #[test]
    fn test_index_path_display() {
        assert_eq!(IndexPath::new(2, 5).to_string(), "[2, 5]");
        assert_eq!(IndexPath::global(0).to_string(), "[global, 0]");
    }

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#CCCCCC").unwrap();
        assert!((color.r - 0.8).abs() < 0.001);
        assert!(Color::from_hex("#CCC").is_none());
    }
}
