//! Measurement service interface.
//!
//! The engine never measures content itself. Elements with an estimated
//! height are handed to a `LayoutMeasuring` implementation exactly once, at
//! the moment they are finalized during a build pass.

use gridline_core::Size;

use crate::description::LayoutPlaceholder;
use crate::section::{LayoutItem, LayoutSupplementaryItem};

/// Measures elements whose height was estimated.
pub trait LayoutMeasuring {
    /// Size for a cell. The item frame holds the column width and the estimate.
    fn measured_size_for_item(&mut self, item: &LayoutItem) -> Size;

    /// Size for a header, footer, or auxiliary item.
    fn measured_size_for_supplementary_item(&mut self, item: &LayoutSupplementaryItem) -> Size;

    /// Size for a placeholder that starts in the section being built.
    fn measured_size_for_placeholder(&mut self, placeholder: &LayoutPlaceholder) -> Size;
}

/// Optional measurement service threaded through a build pass.
///
/// Without a measurer, estimated heights are kept as laid out.
pub struct Sizing<'a> {
    measurer: Option<&'a mut dyn LayoutMeasuring>,
}

impl<'a> Sizing<'a> {
    pub fn new(measurer: Option<&'a mut dyn LayoutMeasuring>) -> Self {
        Self { measurer }
    }

    pub fn none() -> Self {
        Self { measurer: None }
    }

    pub(crate) fn item(&mut self, item: &LayoutItem) -> Option<Size> {
        self.measurer
            .as_mut()
            .map(|measurer| measurer.measured_size_for_item(item))
    }

    pub(crate) fn supplementary_item(&mut self, item: &LayoutSupplementaryItem) -> Option<Size> {
        self.measurer
            .as_mut()
            .map(|measurer| measurer.measured_size_for_supplementary_item(item))
    }

    pub(crate) fn placeholder(&mut self, placeholder: &LayoutPlaceholder) -> Option<Size> {
        self.measurer
            .as_mut()
            .map(|measurer| measurer.measured_size_for_placeholder(placeholder))
    }
}
