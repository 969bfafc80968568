//! Per-section layout metrics.
//!
//! Every overridable metric is stored as an `Option`: `Some` means the value
//! was explicitly set and takes part in merges, `None` means the value is
//! inherited and the type default is reported. Equality compares the
//! effective values only.

use std::num::NonZeroUsize;

use gridline_core::{kinds, Color, EdgeInsets, ItemLayoutOrder};

use crate::options::Theme;

/// Background fill drawn behind the cells of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackgroundAttributes {
    pub color: Option<Color>,
    pub corner_radius: f64,
}

/// The supplementary element kinds a section knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupplementaryKind {
    Header,
    Footer,
    LeftAuxiliary,
    RightAuxiliary,
}

impl SupplementaryKind {
    pub fn element_kind(self) -> &'static str {
        match self {
            SupplementaryKind::Header => kinds::SECTION_HEADER,
            SupplementaryKind::Footer => kinds::SECTION_FOOTER,
            SupplementaryKind::LeftAuxiliary => kinds::LEFT_AUXILIARY_ITEM,
            SupplementaryKind::RightAuxiliary => kinds::RIGHT_AUXILIARY_ITEM,
        }
    }

    pub fn from_element_kind(kind: &str) -> Option<Self> {
        match kind {
            kinds::SECTION_HEADER => Some(SupplementaryKind::Header),
            kinds::SECTION_FOOTER => Some(SupplementaryKind::Footer),
            kinds::LEFT_AUXILIARY_ITEM => Some(SupplementaryKind::LeftAuxiliary),
            kinds::RIGHT_AUXILIARY_ITEM => Some(SupplementaryKind::RightAuxiliary),
            _ => None,
        }
    }

    pub fn is_auxiliary(self) -> bool {
        matches!(self, SupplementaryKind::LeftAuxiliary | SupplementaryKind::RightAuxiliary)
    }
}

/// Relative layout and draw order of the supplementary kinds.
///
/// Each kind carries exactly one order value. Kinds with equal order keep
/// header, footer, left, right precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementaryOrdering {
    pub header: i32,
    pub footer: i32,
    pub left_auxiliary: i32,
    pub right_auxiliary: i32,
}

impl Default for SupplementaryOrdering {
    fn default() -> Self {
        Self {
            header: 0,
            footer: 1,
            left_auxiliary: 2,
            right_auxiliary: 3,
        }
    }
}

impl SupplementaryOrdering {
    pub fn order_of(&self, kind: SupplementaryKind) -> i32 {
        match kind {
            SupplementaryKind::Header => self.header,
            SupplementaryKind::Footer => self.footer,
            SupplementaryKind::LeftAuxiliary => self.left_auxiliary,
            SupplementaryKind::RightAuxiliary => self.right_auxiliary,
        }
    }

    /// All kinds sorted by their order value.
    pub fn ordered_kinds(&self) -> [SupplementaryKind; 4] {
        let mut kinds = [
            SupplementaryKind::Header,
            SupplementaryKind::Footer,
            SupplementaryKind::LeftAuxiliary,
            SupplementaryKind::RightAuxiliary,
        ];
        kinds.sort_by_key(|kind| self.order_of(*kind));
        kinds
    }

    /// Rank of the kind within `ordered_kinds`, used as a draw offset.
    pub fn rank_of(&self, kind: SupplementaryKind) -> usize {
        self.ordered_kinds()
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default()
    }
}

/// A metric present in the input is defined, even when its value is `null`.
#[cfg(feature = "serde")]
fn deserialize_defined<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

macro_rules! section_metrics {
    ($(
        $(#[$doc:meta])*
        $field:ident, $setter:ident, $with:ident: $ty:ty = $default:expr => $metric:ident;
    )*) => {
        /// Names of the overridable metrics, for `SectionMetrics::defines_metric`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Metric {
            $($metric,)*
        }

        /// Layout configuration for one section.
        #[derive(Debug, Clone, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct SectionMetrics {
            $(
                #[cfg_attr(
                    feature = "serde",
                    serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_defined")
                )]
                $field: Option<$ty>,
            )*
            /// Insets for row separators (left/right) and column separators (top/bottom).
            pub separator_insets: EdgeInsets,
            /// Insets for the section separators.
            pub section_separator_insets: EdgeInsets,
        }

        impl SectionMetrics {
            $(
                $(#[$doc])*
                pub fn $field(&self) -> $ty {
                    match &self.$field {
                        Some(value) => value.clone(),
                        None => $default,
                    }
                }

                pub fn $setter(&mut self, value: $ty) -> &mut Self {
                    self.$field = Some(value);
                    self
                }

                pub fn $with(mut self, value: $ty) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*

            /// Whether `metric` was explicitly set on this instance.
            pub fn defines_metric(&self, metric: Metric) -> bool {
                match metric {
                    $(Metric::$metric => self.$field.is_some(),)*
                }
            }

            /// Copy every metric `other` defines onto `self`.
            ///
            /// Copied metrics become defined here. Separator insets are not
            /// tracked and are always copied.
            pub fn apply_values(&mut self, other: &SectionMetrics) {
                self.separator_insets = other.separator_insets;
                self.section_separator_insets = other.section_separator_insets;
                $(
                    if let Some(value) = &other.$field {
                        self.$field = Some(value.clone());
                    }
                )*
            }

            /// Take every metric `self` leaves undefined from `parent`.
            ///
            /// Defined metrics are never overwritten, so repeated calls are
            /// no-ops.
            pub fn inherit_from(&mut self, parent: &SectionMetrics) {
                $(
                    if self.$field.is_none() {
                        self.$field = parent.$field.clone();
                    }
                )*
            }

            fn effective_eq(&self, other: &SectionMetrics) -> bool {
                self.separator_insets == other.separator_insets
                    && self.section_separator_insets == other.section_separator_insets
                    $(&& self.$field() == other.$field())*
            }
        }
    };
}

section_metrics! {
    /// Insets applied to the section frame for backgrounds.
    content_inset, set_content_inset, with_content_inset: EdgeInsets = EdgeInsets::ZERO => ContentInset;
    corner_radius, set_corner_radius, with_corner_radius: f64 = 0.0 => CornerRadius;
    /// Height of every row. `None` sizes rows from measured content.
    row_height, set_row_height, with_row_height: Option<f64> = None => RowHeight;
    /// Seed height for rows that are measured later.
    estimated_row_height, set_estimated_row_height, with_estimated_row_height: f64 = 44.0 => EstimatedRowHeight;
    /// Width used for every column instead of dividing the available width.
    fixed_column_width, set_fixed_column_width, with_fixed_column_width: Option<f64> = None => FixedColumnWidth;
    row_spacing, set_row_spacing, with_row_spacing: f64 = 0.0 => RowSpacing;
    minimum_interitem_spacing, set_minimum_interitem_spacing, with_minimum_interitem_spacing: f64 = 0.0 => MinimumInteritemSpacing;
    left_auxiliary_column_width, set_left_auxiliary_column_width, with_left_auxiliary_column_width: f64 = 0.0 => LeftAuxiliaryColumnWidth;
    right_auxiliary_column_width, set_right_auxiliary_column_width, with_right_auxiliary_column_width: f64 = 0.0 => RightAuxiliaryColumnWidth;
    /// Vertical spacing between items of an auxiliary column.
    auxiliary_column_spacing, set_auxiliary_column_spacing, with_auxiliary_column_spacing: f64 = 0.0 => AuxiliaryColumnSpacing;
    number_of_columns, set_number_of_columns, with_number_of_columns: NonZeroUsize = NonZeroUsize::MIN => NumberOfColumns;
    /// Padding around the cells. Top/bottom apply between headers/footers
    /// and the cells, left/right between the auxiliary columns and the cells.
    padding, set_padding, with_padding: EdgeInsets = EdgeInsets::ZERO => Padding;
    layout_margins, set_layout_margins, with_layout_margins: EdgeInsets = EdgeInsets::ZERO => LayoutMargins;
    shows_column_separator, set_shows_column_separator, with_shows_column_separator: bool = true => ShowsColumnSeparator;
    shows_row_separator, set_shows_row_separator, with_shows_row_separator: bool = false => ShowsRowSeparator;
    shows_section_separator, set_shows_section_separator, with_shows_section_separator: bool = false => ShowsSectionSeparator;
    shows_section_separator_when_last_section, set_shows_section_separator_when_last_section, with_shows_section_separator_when_last_section: bool = false => ShowsSectionSeparatorWhenLastSection;
    background_color, set_background_color, with_background_color: Option<Color> = None => BackgroundColor;
    selected_background_color, set_selected_background_color, with_selected_background_color: Option<Color> = None => SelectedBackgroundColor;
    separator_color, set_separator_color, with_separator_color: Option<Color> = None => SeparatorColor;
    section_separator_color, set_section_separator_color, with_section_separator_color: Option<Color> = None => SectionSeparatorColor;
    content_background, set_content_background, with_content_background: BackgroundAttributes = BackgroundAttributes::default() => ContentBackground;
    cell_layout_order, set_cell_layout_order, with_cell_layout_order: ItemLayoutOrder = ItemLayoutOrder::LeadingToTrailing => CellLayoutOrder;
    supplementary_ordering, set_supplementary_ordering, with_supplementary_ordering: SupplementaryOrdering = SupplementaryOrdering::default() => SupplementaryOrdering;
}

impl PartialEq for SectionMetrics {
    fn eq(&self, other: &Self) -> bool {
        self.effective_eq(other)
    }
}

impl SectionMetrics {
    /// Fill undefined colors from the theme.
    pub fn resolve_missing_values_from_theme(&mut self, theme: &Theme) {
        if self.background_color.is_none() {
            self.background_color = Some(Some(theme.background_color));
        }
        if self.selected_background_color.is_none() {
            self.selected_background_color = Some(Some(theme.selected_background_color));
        }
        if self.separator_color.is_none() {
            self.separator_color = Some(Some(theme.separator_color));
        }
        if self.section_separator_color.is_none() {
            self.section_separator_color = Some(Some(theme.section_separator_color));
        }
    }

    /// Number of columns as a plain count.
    pub fn column_count(&self) -> usize {
        self.number_of_columns().get()
    }

    /// The first metric holding a negative length, if any.
    pub(crate) fn first_negative_metric(&self) -> Option<(&'static str, f64)> {
        let lengths = [
            ("row_height", self.row_height().unwrap_or(0.0)),
            ("estimated_row_height", self.estimated_row_height()),
            ("fixed_column_width", self.fixed_column_width().unwrap_or(0.0)),
            ("row_spacing", self.row_spacing()),
            ("minimum_interitem_spacing", self.minimum_interitem_spacing()),
            ("left_auxiliary_column_width", self.left_auxiliary_column_width()),
            ("right_auxiliary_column_width", self.right_auxiliary_column_width()),
            ("auxiliary_column_spacing", self.auxiliary_column_spacing()),
            ("corner_radius", self.corner_radius()),
        ];
        if let Some(found) = lengths.into_iter().find(|(_, value)| *value < 0.0) {
            return Some(found);
        }

        let insets = [
            ("padding", self.padding()),
            ("content_inset", self.content_inset()),
            ("separator_insets", self.separator_insets),
            ("section_separator_insets", self.section_separator_insets),
        ];
        insets
            .into_iter()
            .find(|(_, insets)| !insets.is_valid())
            .map(|(name, insets)| {
                let worst = insets.top.min(insets.left).min(insets.bottom).min(insets.right);
                (name, worst)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_defaults_are_undefined() {
        let metrics = SectionMetrics::default();
        assert_eq!(metrics.column_count(), 1);
        assert_eq!(metrics.estimated_row_height(), 44.0);
        assert!(metrics.shows_column_separator());
        assert!(!metrics.shows_row_separator());
        assert!(metrics.row_height().is_none());
        assert!(!metrics.defines_metric(Metric::NumberOfColumns));
    }

    #[test]
    fn test_setter_marks_defined() {
        let mut metrics = SectionMetrics::default();
        metrics.set_row_spacing(4.0);
        assert!(metrics.defines_metric(Metric::RowSpacing));
        assert!(!metrics.defines_metric(Metric::Padding));

        // Setting a metric to its default still counts as defined.
        let metrics = SectionMetrics::default().with_shows_column_separator(true);
        assert!(metrics.defines_metric(Metric::ShowsColumnSeparator));
    }

    #[test]
    fn test_apply_values_copies_defined_only() {
        let mut local = SectionMetrics::default()
            .with_number_of_columns(columns(3))
            .with_row_spacing(8.0);
        let mut other = SectionMetrics::default().with_row_spacing(2.0);
        other.separator_insets = EdgeInsets::symmetric(15.0, 0.0);

        local.apply_values(&other);

        assert_eq!(local.column_count(), 3);
        assert_eq!(local.row_spacing(), 2.0);
        assert_eq!(local.separator_insets.left, 15.0);
    }

    #[test]
    fn test_apply_values_is_idempotent() {
        let source = SectionMetrics::default()
            .with_padding(EdgeInsets::uniform(4.0))
            .with_row_height(Some(30.0));
        let mut once = SectionMetrics::default().with_row_spacing(1.0);
        once.apply_values(&source);
        let mut twice = once.clone();
        twice.apply_values(&source);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_inherit_never_overwrites_defined() {
        let parent = SectionMetrics::default()
            .with_number_of_columns(columns(4))
            .with_row_spacing(10.0);
        let mut local = SectionMetrics::default().with_row_spacing(2.0);

        local.inherit_from(&parent);
        local.inherit_from(&parent);

        assert_eq!(local.row_spacing(), 2.0);
        assert_eq!(local.column_count(), 4);
        assert!(local.defines_metric(Metric::NumberOfColumns));
    }

    #[test]
    fn test_resolve_from_theme_fills_missing_colors() {
        let custom = Color::rgb(1.0, 0.0, 0.0);
        let mut metrics = SectionMetrics::default().with_separator_color(Some(custom));
        let theme = Theme::default();

        metrics.resolve_missing_values_from_theme(&theme);

        assert_eq!(metrics.separator_color(), Some(custom));
        assert_eq!(metrics.background_color(), Some(theme.background_color));
        assert_eq!(metrics.section_separator_color(), Some(theme.section_separator_color));
    }

    #[test]
    fn test_equality_ignores_flags() {
        let explicit = SectionMetrics::default().with_estimated_row_height(44.0);
        let implicit = SectionMetrics::default();
        assert_eq!(explicit, implicit);
        assert_ne!(explicit, SectionMetrics::default().with_estimated_row_height(50.0));
    }

    #[test]
    fn test_supplementary_ordering() {
        let ordering = SupplementaryOrdering {
            header: 3,
            footer: 0,
            left_auxiliary: 2,
            right_auxiliary: 1,
        };
        assert_eq!(
            ordering.ordered_kinds(),
            [
                SupplementaryKind::Footer,
                SupplementaryKind::RightAuxiliary,
                SupplementaryKind::LeftAuxiliary,
                SupplementaryKind::Header,
            ]
        );
        assert_eq!(ordering.rank_of(SupplementaryKind::Header), 3);
    }

    #[test]
    fn test_negative_metric_detection() {
        assert!(SectionMetrics::default().first_negative_metric().is_none());
        let metrics = SectionMetrics::default().with_row_spacing(-1.0);
        assert_eq!(metrics.first_negative_metric(), Some(("row_spacing", -1.0)));
        let metrics = SectionMetrics::default().with_padding(EdgeInsets::new(0.0, -2.0, 0.0, 0.0));
        assert_eq!(metrics.first_negative_metric(), Some(("padding", -2.0)));
    }
}
