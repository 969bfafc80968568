//! Error types for the gridline engine.
//!
//! Geometry never fails at runtime: lookups return `Option` and degenerate
//! input degrades to empty sections. Errors are reserved for descriptions
//! that are rejected before any geometry is computed.

use crate::types::SectionIndex;
use thiserror::Error;

/// Top-level error type for the gridline engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors in a layout description, reported before layout starts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Section {section}: metric '{metric}' must not be negative, found {value}")]
    NegativeMetric {
        section: SectionIndex,
        metric: &'static str,
        value: f64,
    },

    #[error("Section {section}: {kind} item {index} has negative height {value}")]
    NegativeSupplementaryHeight {
        section: SectionIndex,
        kind: String,
        index: usize,
        value: f64,
    },

    #[error("Section {section}: {role} index {index} is out of range for {count} items")]
    ItemIndexOutOfRange {
        section: SectionIndex,
        role: &'static str,
        index: usize,
        count: usize,
    },

    #[error("Section {section}: placeholder must cover at least one section")]
    EmptyPlaceholder { section: SectionIndex },

    #[error("Section at position {position} is described as section {found}")]
    MisplacedSection { position: usize, found: SectionIndex },

    #[error("Global section description carries index {found}")]
    GlobalIndexMismatch { found: SectionIndex },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::NegativeMetric {
            section: SectionIndex::At(2),
            metric: "row_spacing",
            value: -4.0,
        };
        assert_eq!(
            err.to_string(),
            "Section 2: metric 'row_spacing' must not be negative, found -4"
        );

        let wrapped: LayoutError = err.clone().into();
        assert_eq!(wrapped, LayoutError::Config(err));
        assert!(wrapped.to_string().contains("row_spacing"));
    }
}
