//! Layout attributes handed to the host for drawing.

use gridline_core::{Color, IndexPath, Point, Rect};

/// What kind of view an attribute describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Cell,
    Supplementary(String),
    Decoration(String),
}

impl ElementCategory {
    /// Element kind of supplementary and decoration views.
    pub fn element_kind(&self) -> Option<&str> {
        match self {
            ElementCategory::Cell => None,
            ElementCategory::Supplementary(kind) | ElementCategory::Decoration(kind) => Some(kind),
        }
    }
}

/// Position and draw state of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutAttributes {
    pub category: ElementCategory,
    pub index_path: IndexPath,
    /// Effective frame, including any pinning adjustment
    pub frame: Rect,
    /// Origin before pinning
    pub unpinned_origin: Point,
    pub z_index: i32,
    pub is_hidden: bool,
    pub is_pinned: bool,
    pub background_color: Option<Color>,
    pub selected_background_color: Option<Color>,
    pub corner_radius: f64,
    /// Column of a cell within its row
    pub column_index: Option<usize>,
    pub has_estimated_height: bool,
}

impl LayoutAttributes {
    fn new(category: ElementCategory, index_path: IndexPath, frame: Rect, z_index: i32) -> Self {
        Self {
            category,
            index_path,
            frame,
            unpinned_origin: frame.origin(),
            z_index,
            is_hidden: false,
            is_pinned: false,
            background_color: None,
            selected_background_color: None,
            corner_radius: 0.0,
            column_index: None,
            has_estimated_height: false,
        }
    }

    pub fn cell(index_path: IndexPath, frame: Rect, z_index: i32) -> Self {
        Self::new(ElementCategory::Cell, index_path, frame, z_index)
    }

    pub fn supplementary(kind: &str, index_path: IndexPath, frame: Rect, z_index: i32) -> Self {
        Self::new(ElementCategory::Supplementary(kind.to_string()), index_path, frame, z_index)
    }

    pub fn decoration(kind: &str, index_path: IndexPath, frame: Rect, z_index: i32) -> Self {
        Self::new(ElementCategory::Decoration(kind.to_string()), index_path, frame, z_index)
    }

    pub fn is_cell(&self) -> bool {
        self.category == ElementCategory::Cell
    }

    pub fn element_kind(&self) -> Option<&str> {
        self.category.element_kind()
    }
}
