//! Declarative input to the layout engine.
//!
//! A `LayoutDescription` lists what to lay out: per-section metrics, item
//! counts, supplementary items and placeholders. It is validated as a whole
//! before any geometry is computed.

use gridline_core::{ConfigError, Color, EdgeInsets, Point, Rect, SectionIndex, Size};
use indexmap::IndexMap;

use crate::builder::SectionStyle;
use crate::metrics::SectionMetrics;

/// A header, footer, or auxiliary column entry as supplied by a data source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementaryItem {
    pub element_kind: String,
    /// Fixed height. `None` means the height is estimated and measured later.
    pub height: Option<f64>,
    pub estimated_height: f64,
    pub is_hidden: bool,
    /// Keep showing this item while the section displays a placeholder.
    pub is_visible_while_showing_placeholder: bool,
    /// Keep this header visible at the top while its section scrolls.
    pub should_pin: bool,
    pub background_color: Option<Color>,
}

impl SupplementaryItem {
    pub fn new(element_kind: impl Into<String>) -> Self {
        Self {
            element_kind: element_kind.into(),
            height: None,
            estimated_height: 44.0,
            is_hidden: false,
            is_visible_while_showing_placeholder: false,
            should_pin: false,
            background_color: None,
        }
    }

    pub fn header() -> Self {
        Self::new(gridline_core::kinds::SECTION_HEADER)
    }

    pub fn footer() -> Self {
        Self::new(gridline_core::kinds::SECTION_FOOTER)
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_estimated_height(mut self, height: f64) -> Self {
        self.height = None;
        self.estimated_height = height;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.should_pin = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn visible_while_showing_placeholder(mut self) -> Self {
        self.is_visible_while_showing_placeholder = true;
        self
    }

    pub fn has_estimated_height(&self) -> bool {
        self.height.is_none()
    }

    /// Height used for stacking before any measurement. Hidden items take no space.
    pub fn fixed_height(&self) -> f64 {
        if self.is_hidden {
            0.0
        } else {
            self.height.unwrap_or(self.estimated_height)
        }
    }
}

/// A stand-in region shown instead of item content.
///
/// A placeholder starts at one section and may cover the sections after it;
/// only the starting section reserves its height.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPlaceholder {
    pub starting_section_index: usize,
    pub section_count: usize,
    pub height: f64,
    pub has_estimated_height: bool,
    pub should_fill_available_height: bool,
    pub frame: Rect,
}

impl LayoutPlaceholder {
    pub fn new(starting_section_index: usize) -> Self {
        Self {
            starting_section_index,
            section_count: 1,
            height: 200.0,
            has_estimated_height: true,
            should_fill_available_height: true,
            frame: Rect::ZERO,
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self.has_estimated_height = false;
        self
    }

    pub fn with_estimated_height(mut self, height: f64) -> Self {
        self.height = height;
        self.has_estimated_height = true;
        self
    }

    pub fn spanning(mut self, section_count: usize) -> Self {
        self.section_count = section_count;
        self
    }

    pub fn filling_available_height(mut self, fill: bool) -> Self {
        self.should_fill_available_height = fill;
        self
    }

    /// Whether the placeholder replaces the content of `section`.
    pub fn covers(&self, section: SectionIndex) -> bool {
        match section.position() {
            Some(index) => {
                index >= self.starting_section_index
                    && index < self.starting_section_index + self.section_count
            }
            None => false,
        }
    }

    pub fn starts_at(&self, section: SectionIndex) -> bool {
        section.position() == Some(self.starting_section_index)
    }
}

/// The horizontal extent a section is laid out in, starting at `origin`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutBounds {
    pub origin: Point,
    pub width: f64,
}

impl LayoutBounds {
    pub fn new(origin: Point, width: f64) -> Self {
        Self { origin, width }
    }
}

/// Data used for creating one layout section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionDescription {
    pub section_index: SectionIndex,
    pub style: SectionStyle,
    pub number_of_items: usize,
    /// `None` yields an empty section rather than failing the whole build.
    pub metrics: Option<SectionMetrics>,
    pub supplementary_items_by_kind: IndexMap<String, Vec<SupplementaryItem>>,
    pub placeholder: Option<LayoutPlaceholder>,
    /// Item being dragged; it is placed but takes no slot of its own.
    pub dragged_item_index: Option<usize>,
    /// Slot reserved for a drop target during interactive reordering.
    pub phantom_cell_index: Option<usize>,
    pub phantom_cell_size: Size,
}

impl SectionDescription {
    pub fn new(section_index: impl Into<SectionIndex>, metrics: SectionMetrics) -> Self {
        Self {
            section_index: section_index.into(),
            style: SectionStyle::default(),
            number_of_items: 0,
            metrics: Some(metrics),
            supplementary_items_by_kind: IndexMap::new(),
            placeholder: None,
            dragged_item_index: None,
            phantom_cell_index: None,
            phantom_cell_size: Size::ZERO,
        }
    }

    /// A description for the global section.
    pub fn global(metrics: SectionMetrics) -> Self {
        Self::new(SectionIndex::Global, metrics)
    }

    pub fn without_metrics(section_index: impl Into<SectionIndex>) -> Self {
        let mut description = Self::new(section_index, SectionMetrics::default());
        description.metrics = None;
        description
    }

    pub fn with_items(mut self, number_of_items: usize) -> Self {
        self.number_of_items = number_of_items;
        self
    }

    pub fn with_style(mut self, style: SectionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_supplementary_item(mut self, item: SupplementaryItem) -> Self {
        self.add_supplementary_item(item);
        self
    }

    pub fn with_placeholder(mut self, placeholder: LayoutPlaceholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_phantom_cell(mut self, index: usize, size: Size) -> Self {
        self.phantom_cell_index = Some(index);
        self.phantom_cell_size = size;
        self
    }

    pub fn with_dragged_item(mut self, index: usize) -> Self {
        self.dragged_item_index = Some(index);
        self
    }

    /// Append an item to the list of its kind.
    pub fn add_supplementary_item(&mut self, item: SupplementaryItem) {
        self.supplementary_items_by_kind
            .entry(item.element_kind.clone())
            .or_default()
            .push(item);
    }

    pub fn supplementary_items_of_kind(&self, kind: &str) -> &[SupplementaryItem] {
        self.supplementary_items_by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check the description for configuration errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let section = self.section_index;

        if let Some(metrics) = &self.metrics {
            if let Some((metric, value)) = metrics.first_negative_metric() {
                return Err(ConfigError::NegativeMetric { section, metric, value });
            }
        }

        for (kind, items) in &self.supplementary_items_by_kind {
            for (index, item) in items.iter().enumerate() {
                let height = item.height.unwrap_or(item.estimated_height);
                if height < 0.0 {
                    return Err(ConfigError::NegativeSupplementaryHeight {
                        section,
                        kind: kind.clone(),
                        index,
                        value: height,
                    });
                }
            }
        }

        if let Some(index) = self.dragged_item_index {
            if index >= self.number_of_items {
                return Err(ConfigError::ItemIndexOutOfRange {
                    section,
                    role: "dragged item",
                    index,
                    count: self.number_of_items,
                });
            }
        }

        if let Some(index) = self.phantom_cell_index {
            // The phantom may sit after the last item.
            if index > self.number_of_items {
                return Err(ConfigError::ItemIndexOutOfRange {
                    section,
                    role: "phantom cell",
                    index,
                    count: self.number_of_items,
                });
            }
            let size = self.phantom_cell_size;
            if size.width < 0.0 || size.height < 0.0 {
                return Err(ConfigError::NegativeMetric {
                    section,
                    metric: "phantom_cell_size",
                    value: size.width.min(size.height),
                });
            }
        }

        if let Some(placeholder) = &self.placeholder {
            if placeholder.section_count == 0 {
                return Err(ConfigError::EmptyPlaceholder { section });
            }
            if placeholder.height < 0.0 {
                return Err(ConfigError::NegativeMetric {
                    section,
                    metric: "placeholder_height",
                    value: placeholder.height,
                });
            }
        }

        Ok(())
    }
}

/// Data used for creating a complete layout.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutDescription {
    /// Size of the viewport
    pub size: Size,
    pub content_offset: Point,
    pub content_inset: EdgeInsets,
    pub bounds: Rect,
    pub sections: Vec<SectionDescription>,
    pub global_section: Option<SectionDescription>,
}

impl LayoutDescription {
    /// A description for a viewport of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            bounds: Rect::from_origin_size(Point::ZERO, size),
            ..Default::default()
        }
    }

    pub fn with_section(mut self, section: SectionDescription) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_global_section(mut self, section: SectionDescription) -> Self {
        self.global_section = Some(section);
        self
    }

    pub fn with_content_offset(mut self, offset: Point) -> Self {
        self.content_offset = offset;
        self
    }

    pub fn with_content_inset(mut self, inset: EdgeInsets) -> Self {
        self.content_inset = inset;
        self
    }

    /// Width sections are laid out in.
    pub fn layout_width(&self) -> f64 {
        self.size.width - self.content_inset.horizontal()
    }

    /// Check every section description; the first error wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(global) = &self.global_section {
            if !global.section_index.is_global() {
                return Err(ConfigError::GlobalIndexMismatch {
                    found: global.section_index,
                });
            }
            global.validate()?;
        }

        for (position, section) in self.sections.iter().enumerate() {
            if section.section_index != SectionIndex::At(position) {
                return Err(ConfigError::MisplacedSection {
                    position,
                    found: section.section_index,
                });
            }
            section.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplementary_fixed_height() {
        let header = SupplementaryItem::header().with_height(30.0);
        assert_eq!(header.fixed_height(), 30.0);
        assert!(!header.has_estimated_height());

        let estimated = SupplementaryItem::footer().with_estimated_height(20.0);
        assert!(estimated.has_estimated_height());
        assert_eq!(estimated.fixed_height(), 20.0);

        assert_eq!(header.hidden().fixed_height(), 0.0);
    }

    #[test]
    fn test_supplementary_items_grouped_by_kind() {
        let description = SectionDescription::new(0, SectionMetrics::default())
            .with_supplementary_item(SupplementaryItem::header().with_height(10.0))
            .with_supplementary_item(SupplementaryItem::footer().with_height(5.0))
            .with_supplementary_item(SupplementaryItem::header().with_height(20.0));

        let headers = description.supplementary_items_of_kind(gridline_core::kinds::SECTION_HEADER);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1].height, Some(20.0));
        assert!(description.supplementary_items_of_kind("missing").is_empty());
    }

    #[test]
    fn test_placeholder_coverage() {
        let placeholder = LayoutPlaceholder::new(2).spanning(2);
        assert!(!placeholder.covers(SectionIndex::At(1)));
        assert!(placeholder.covers(SectionIndex::At(2)));
        assert!(placeholder.covers(SectionIndex::At(3)));
        assert!(!placeholder.covers(SectionIndex::At(4)));
        assert!(!placeholder.covers(SectionIndex::Global));
        assert!(placeholder.starts_at(SectionIndex::At(2)));
        assert!(!placeholder.starts_at(SectionIndex::At(3)));
    }

    #[test]
    fn test_validate_rejects_negative_metrics() {
        let metrics = SectionMetrics::default().with_minimum_interitem_spacing(-3.0);
        let description = LayoutDescription::new(Size::new(320.0, 480.0))
            .with_section(SectionDescription::new(0, metrics).with_items(2));

        assert_eq!(
            description.validate(),
            Err(ConfigError::NegativeMetric {
                section: SectionIndex::At(0),
                metric: "minimum_interitem_spacing",
                value: -3.0,
            })
        );
    }

    #[test]
    fn test_validate_rejects_misplaced_sections() {
        let description = LayoutDescription::new(Size::new(320.0, 480.0))
            .with_section(SectionDescription::new(0, SectionMetrics::default()))
            .with_section(SectionDescription::new(5, SectionMetrics::default()));

        assert_eq!(
            description.validate(),
            Err(ConfigError::MisplacedSection {
                position: 1,
                found: SectionIndex::At(5),
            })
        );

        let description = LayoutDescription::new(Size::new(320.0, 480.0))
            .with_global_section(SectionDescription::new(0, SectionMetrics::default()));
        assert!(matches!(
            description.validate(),
            Err(ConfigError::GlobalIndexMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_indices() {
        let section = SectionDescription::new(0, SectionMetrics::default())
            .with_items(3)
            .with_dragged_item(3);
        assert!(matches!(
            section.validate(),
            Err(ConfigError::ItemIndexOutOfRange { role: "dragged item", .. })
        ));

        let section = SectionDescription::new(0, SectionMetrics::default())
            .with_items(3)
            .with_phantom_cell(3, Size::new(10.0, 10.0));
        assert!(section.validate().is_ok());

        let section = section.with_phantom_cell(4, Size::new(10.0, 10.0));
        assert!(section.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_placeholder() {
        let section = SectionDescription::new(0, SectionMetrics::default())
            .with_placeholder(LayoutPlaceholder::new(0).spanning(0));
        assert_eq!(
            section.validate(),
            Err(ConfigError::EmptyPlaceholder {
                section: SectionIndex::At(0)
            })
        );
    }
}
