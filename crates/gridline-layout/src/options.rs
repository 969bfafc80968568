//! Engine configuration.

use gridline_core::Color;

/// Colors used for metrics that a section leaves undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    pub background_color: Color,
    pub selected_background_color: Color,
    pub separator_color: Color,
    pub section_separator_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            selected_background_color: Color::white(235.0 / 255.0, 1.0),
            separator_color: Color::white(204.0 / 255.0, 1.0),
            section_separator_color: Color::white(204.0 / 255.0, 1.0),
        }
    }
}

/// Options for layout computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Thickness of separator lines (one device pixel in points)
    pub hairline: f64,
    /// Fallback colors for undefined metrics
    pub theme: Theme,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            hairline: 1.0,
            theme: Theme::default(),
        }
    }
}

impl LayoutOptions {
    /// Options for a display with the given pixel density.
    pub fn for_scale(scale: f64) -> Self {
        let hairline = if scale > 0.0 { 1.0 / scale } else { 1.0 };
        Self {
            hairline,
            ..Default::default()
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hairline_for_scale() {
        assert_eq!(LayoutOptions::for_scale(2.0).hairline, 0.5);
        assert_eq!(LayoutOptions::for_scale(0.0).hairline, 1.0);
        assert_eq!(LayoutOptions::default().hairline, 1.0);
    }
}
