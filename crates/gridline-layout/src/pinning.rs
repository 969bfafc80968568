//! Sticky headers.
//!
//! Pinning never moves a stored frame. It records an override for the
//! vertical position of pinnable headers, recomputed from scratch for every
//! content offset so that repeated updates with the same offset agree.

use gridline_core::kinds;

use crate::section::LayoutSection;

/// Pin the headers of the global section and of the section under the
/// pinned area, for a visible area starting at `pinned_top`.
pub(crate) fn pin_headers(global: Option<&mut LayoutSection>, sections: &mut [LayoutSection], pinned_top: f64) {
    let mut pinned_bottom = pinned_top;

    if let Some(global) = global {
        global.reset_pinning();
        pinned_bottom = pin_global_headers(global, pinned_top);
    }

    for section in sections.iter_mut() {
        section.reset_pinning();
    }

    let under_pinned_area = sections
        .iter_mut()
        .find(|section| section.frame.y <= pinned_bottom && pinned_bottom < section.frame.max_y());
    if let Some(section) = under_pinned_area {
        log::trace!(
            "pinning headers of section {} below {pinned_bottom}",
            section.section_index
        );
        pin_section_headers(section, pinned_bottom);
    }
}

/// Global headers stack from the top of the visible area and never leave it.
/// Returns the bottom of the pinned stack.
fn pin_global_headers(section: &mut LayoutSection, pinned_top: f64) -> f64 {
    let mut bottom = pinned_top;
    if let Some(headers) = section.supplementary_items_by_kind.get_mut(kinds::SECTION_HEADER) {
        for header in headers.iter_mut().filter(|header| header.should_pin && !header.is_hidden) {
            let y = header.frame.y.max(bottom);
            header.pin_to(y);
            bottom = y + header.frame.height;
        }
    }

    if let Some(background) = &mut section.background {
        let y = background.frame.y.max(pinned_top);
        background.pinned_y = (y != background.frame.y).then_some(y);
    }
    bottom
}

/// Headers of a regular section stack below `top` but are pushed up by the
/// section's bottom edge, so they leave together with their section.
fn pin_section_headers(section: &mut LayoutSection, top: f64) {
    let limit = section.frame.max_y();
    let Some(headers) = section.supplementary_items_by_kind.get_mut(kinds::SECTION_HEADER) else {
        return;
    };

    let mut remaining: f64 = headers
        .iter()
        .filter(|header| header.should_pin && !header.is_hidden)
        .map(|header| header.frame.height)
        .sum();
    let mut stack_top = top;

    for header in headers.iter_mut().filter(|header| header.should_pin && !header.is_hidden) {
        let height = header.frame.height;
        let y = stack_top.min(limit - remaining).max(header.frame.y);
        header.pin_to(y);
        stack_top = y + height;
        remaining -= height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SectionStyle;
    use crate::description::{LayoutBounds, SectionDescription, SupplementaryItem};
    use crate::measure::Sizing;
    use crate::metrics::SectionMetrics;
    use crate::options::LayoutOptions;
    use gridline_core::{Point, SectionIndex};

    fn section(index: SectionIndex, y: f64, items: usize) -> LayoutSection {
        let description = SectionDescription::new(index, SectionMetrics::default().with_row_height(Some(50.0)))
            .with_items(items)
            .with_supplementary_item(SupplementaryItem::header().with_height(20.0).pinned());
        SectionStyle::Grid.builder().make_section(
            &description,
            LayoutBounds::new(Point::new(0.0, y), 100.0),
            &LayoutOptions::default(),
            &mut Sizing::none(),
        )
    }

    #[test]
    fn test_header_pins_inside_its_section() {
        let mut sections = vec![section(SectionIndex::At(0), 0.0, 4)];
        assert_eq!(sections[0].frame.height, 220.0);

        pin_headers(None, &mut sections, 100.0);
        let header = &sections[0].headers()[0];
        assert!(header.is_pinned());
        assert_eq!(header.effective_frame().y, 100.0);
        assert_eq!(header.frame.y, 0.0);

        // Pushed up by the section's bottom edge.
        pin_headers(None, &mut sections, 210.0);
        assert_eq!(sections[0].headers()[0].effective_frame().y, 200.0);

        pin_headers(None, &mut sections, 0.0);
        assert!(!sections[0].headers()[0].is_pinned());
    }

    #[test]
    fn test_global_headers_stack_above_section_headers() {
        let mut global = section(SectionIndex::Global, 0.0, 0);
        let mut sections = vec![section(SectionIndex::At(0), 20.0, 4)];

        pin_headers(Some(&mut global), &mut sections, 60.0);

        assert_eq!(global.headers()[0].effective_frame().y, 60.0);
        assert_eq!(sections[0].headers()[0].effective_frame().y, 80.0);
    }

    #[test]
    fn test_pinning_is_idempotent() {
        let mut global = section(SectionIndex::Global, 0.0, 0);
        let mut sections = vec![section(SectionIndex::At(0), 20.0, 4), section(SectionIndex::At(1), 240.0, 2)];

        pin_headers(Some(&mut global), &mut sections, 300.0);
        let first: Vec<_> = sections.iter().map(|s| s.layout_attributes()).collect();
        pin_headers(Some(&mut global), &mut sections, 300.0);
        let second: Vec<_> = sections.iter().map(|s| s.layout_attributes()).collect();

        assert_eq!(first, second);
        assert!(!sections[0].headers()[0].is_pinned());
        assert_eq!(sections[1].headers()[0].effective_frame().y, 320.0);
    }
}
