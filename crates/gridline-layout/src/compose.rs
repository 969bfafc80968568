//! Composition of several section providers into one flattened section space.
//!
//! A composed provider owns a list of children, each mapped onto a
//! contiguous range of global sections. Its own per-section metrics act as
//! defaults: a child's snapshot is applied on top, and the composed
//! provider's supplementary items come before the child's.

use gridline_core::{IndexPath, SectionIndex};
use indexmap::IndexMap;

use crate::builder::SectionStyle;
use crate::description::{LayoutPlaceholder, SectionDescription, SupplementaryItem};
use crate::metrics::SectionMetrics;

/// Translation between a provider's local sections and the global ones.
pub trait SectionMapping {
    fn local_section(&self, global_section: usize) -> Option<usize>;

    fn global_section(&self, local_section: usize) -> Option<usize>;

    fn local_index_path(&self, global: IndexPath) -> Option<IndexPath> {
        let local = self.local_section(global.section.position()?)?;
        Some(IndexPath::new(local, global.item))
    }

    fn global_index_path(&self, local: IndexPath) -> Option<IndexPath> {
        let global = self.global_section(local.section.position()?)?;
        Some(IndexPath::new(global, local.item))
    }
}

/// Maps local sections `0..section_count` onto a contiguous global range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionRangeMapping {
    pub global_start: usize,
    pub section_count: usize,
}

impl SectionRangeMapping {
    pub fn new(global_start: usize, section_count: usize) -> Self {
        Self {
            global_start,
            section_count,
        }
    }

    pub fn contains_global(&self, global_section: usize) -> bool {
        global_section >= self.global_start && global_section < self.global_start + self.section_count
    }
}

impl SectionMapping for SectionRangeMapping {
    fn local_section(&self, global_section: usize) -> Option<usize> {
        self.contains_global(global_section)
            .then(|| global_section - self.global_start)
    }

    fn global_section(&self, local_section: usize) -> Option<usize> {
        (local_section < self.section_count).then(|| self.global_start + local_section)
    }
}

/// Provider-side metrics of one section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataSourceSectionMetrics {
    pub metrics: SectionMetrics,
    pub style: SectionStyle,
    pub supplementary_items_by_kind: IndexMap<String, Vec<SupplementaryItem>>,
    /// Key of the placeholder content shown while the section has no items
    pub placeholder: Option<String>,
    pub placeholder_height: f64,
    pub placeholder_has_estimated_height: bool,
    pub placeholder_should_fill_available_height: bool,
}

impl Default for DataSourceSectionMetrics {
    fn default() -> Self {
        Self {
            metrics: SectionMetrics::default(),
            style: SectionStyle::default(),
            supplementary_items_by_kind: IndexMap::new(),
            placeholder: None,
            placeholder_height: 200.0,
            placeholder_has_estimated_height: true,
            placeholder_should_fill_available_height: true,
        }
    }
}

impl DataSourceSectionMetrics {
    pub fn new(metrics: SectionMetrics) -> Self {
        Self {
            metrics,
            ..Default::default()
        }
    }

    pub fn with_supplementary_item(mut self, item: SupplementaryItem) -> Self {
        self.add_supplementary_item(item);
        self
    }

    pub fn with_placeholder(mut self, key: impl Into<String>) -> Self {
        self.placeholder = Some(key.into());
        self
    }

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

    /// Merge `other` into `self`.
    ///
    /// Defined metrics are copied, supplementary lists are concatenated after
    /// the existing ones, the first placeholder wins and the placeholder
    /// sizing always comes from `other`.
    pub fn apply_values(&mut self, other: &DataSourceSectionMetrics) {
        self.metrics.apply_values(&other.metrics);
        self.style = other.style;
        for (kind, items) in &other.supplementary_items_by_kind {
            self.supplementary_items_by_kind
                .entry(kind.clone())
                .or_default()
                .extend(items.iter().cloned());
        }
        if self.placeholder.is_none() {
            self.placeholder = other.placeholder.clone();
        }
        self.placeholder_height = other.placeholder_height;
        self.placeholder_has_estimated_height = other.placeholder_has_estimated_height;
        self.placeholder_should_fill_available_height = other.placeholder_should_fill_available_height;
    }

    fn layout_placeholder(&self, starting_section_index: usize, section_count: usize) -> LayoutPlaceholder {
        let placeholder = LayoutPlaceholder::new(starting_section_index)
            .spanning(section_count)
            .filling_available_height(self.placeholder_should_fill_available_height);
        if self.placeholder_has_estimated_height {
            placeholder.with_estimated_height(self.placeholder_height)
        } else {
            placeholder.with_height(self.placeholder_height)
        }
    }
}

/// A provider of section counts, item counts and section metrics.
pub trait SectionMetricsSource {
    fn number_of_sections(&self) -> usize;

    fn number_of_items(&self, section: usize) -> usize;

    /// Metrics declared by this provider itself for `section`.
    fn section_metrics(&self, section: usize) -> Option<&DataSourceSectionMetrics>;

    /// Metrics of the global section, if the provider has one.
    fn global_metrics(&self) -> Option<&DataSourceSectionMetrics> {
        None
    }

    /// Supplementary items of `kind` in `section`. Composed providers add
    /// their children's items when `include_children` is set.
    fn number_of_supplementary_items(&self, kind: &str, section: usize, include_children: bool) -> usize {
        let _ = include_children;
        self.section_metrics(section)
            .map_or(0, |metrics| metrics.supplementary_items_of_kind(kind).len())
    }

    /// The supplementary item at `index` among all items of `kind` in `section`.
    fn supplementary_item(&self, kind: &str, section: usize, index: usize) -> Option<&SupplementaryItem> {
        self.section_metrics(section)?
            .supplementary_items_of_kind(kind)
            .get(index)
    }

    /// Fully merged metrics used to lay out `section`.
    fn snapshot_metrics(&self, section: usize) -> Option<DataSourceSectionMetrics> {
        self.section_metrics(section).cloned()
    }
}

/// A plain provider with a fixed list of sections.
#[derive(Debug, Clone, Default)]
pub struct SectionList {
    sections: Vec<(usize, DataSourceSectionMetrics)>,
    global: Option<DataSourceSectionMetrics>,
}

impl SectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, number_of_items: usize, metrics: DataSourceSectionMetrics) -> Self {
        self.sections.push((number_of_items, metrics));
        self
    }

    pub fn with_global(mut self, metrics: DataSourceSectionMetrics) -> Self {
        self.global = Some(metrics);
        self
    }
}

impl SectionMetricsSource for SectionList {
    fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |(count, _)| *count)
    }

    fn section_metrics(&self, section: usize) -> Option<&DataSourceSectionMetrics> {
        self.sections.get(section).map(|(_, metrics)| metrics)
    }

    fn global_metrics(&self) -> Option<&DataSourceSectionMetrics> {
        self.global.as_ref()
    }
}

struct ComposedChild {
    mapping: SectionRangeMapping,
    source: Box<dyn SectionMetricsSource>,
}

/// Flattens child providers into consecutive global sections.
pub struct ComposedMetrics {
    default_metrics: DataSourceSectionMetrics,
    global: Option<DataSourceSectionMetrics>,
    children: Vec<ComposedChild>,
}

impl std::fmt::Debug for ComposedMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMetrics")
            .field("default_metrics", &self.default_metrics)
            .field("global", &self.global)
            .field(
                "children",
                &self.children.iter().map(|child| child.mapping).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ComposedMetrics {
    /// A composed provider whose own metrics apply to every section.
    pub fn new(default_metrics: DataSourceSectionMetrics) -> Self {
        Self {
            default_metrics,
            global: None,
            children: Vec::new(),
        }
    }

    pub fn with_global(mut self, metrics: DataSourceSectionMetrics) -> Self {
        self.global = Some(metrics);
        self
    }

    /// Append a child after the existing ones; returns its section range.
    pub fn add_child(&mut self, source: Box<dyn SectionMetricsSource>) -> SectionRangeMapping {
        let mapping = SectionRangeMapping::new(self.number_of_sections(), source.number_of_sections());
        self.children.push(ComposedChild { mapping, source });
        mapping
    }

    pub fn mappings(&self) -> impl Iterator<Item = SectionRangeMapping> + '_ {
        self.children.iter().map(|child| child.mapping)
    }

    fn child_for_global_section(&self, section: usize) -> Option<(&ComposedChild, usize)> {
        self.children.iter().find_map(|child| {
            child
                .mapping
                .local_section(section)
                .map(|local| (child, local))
        })
    }

    /// Index path in the composed space of a supplementary item reported by
    /// child `child_index` at `local`. The composed provider's own items of
    /// the same kind come first.
    pub fn supplementary_index_path(&self, kind: &str, child_index: usize, local: IndexPath) -> Option<IndexPath> {
        let child = self.children.get(child_index)?;
        let global = child.mapping.global_index_path(local)?;
        let section = global.section.position()?;
        let own = self.number_of_supplementary_items(kind, section, false);
        Some(IndexPath::new(section, global.item + own))
    }

    /// Layout input for every section, with placeholders spanning runs of
    /// empty sections that show the same placeholder.
    pub fn section_descriptions(&self) -> Vec<SectionDescription> {
        let snapshots: Vec<(usize, DataSourceSectionMetrics)> = (0..self.number_of_sections())
            .map(|section| {
                let snapshot = self
                    .snapshot_metrics(section)
                    .unwrap_or_else(|| self.default_metrics.clone());
                (self.number_of_items(section), snapshot)
            })
            .collect();

        let mut descriptions: Vec<SectionDescription> = snapshots
            .iter()
            .enumerate()
            .map(|(section, (items, snapshot))| description_for(SectionIndex::At(section), *items, snapshot))
            .collect();

        let mut start = 0;
        while start < snapshots.len() {
            let key = placeholder_key(&snapshots[start]);
            let Some(key) = key else {
                start += 1;
                continue;
            };
            let run = snapshots[start..]
                .iter()
                .take_while(|entry| placeholder_key(entry) == Some(key))
                .count();
            let placeholder = snapshots[start].1.layout_placeholder(start, run);
            for description in &mut descriptions[start..start + run] {
                description.placeholder = Some(placeholder.clone());
            }
            start += run;
        }

        descriptions
    }

    /// Layout input for the global section.
    pub fn global_description(&self) -> Option<SectionDescription> {
        self.global
            .as_ref()
            .map(|metrics| description_for(SectionIndex::Global, 0, metrics))
    }
}

/// Placeholder shown by an empty section, if any.
fn placeholder_key((items, snapshot): &(usize, DataSourceSectionMetrics)) -> Option<&str> {
    if *items > 0 {
        return None;
    }
    snapshot.placeholder.as_deref()
}

fn description_for(section_index: SectionIndex, items: usize, snapshot: &DataSourceSectionMetrics) -> SectionDescription {
    let mut description = SectionDescription::new(section_index, snapshot.metrics.clone())
        .with_style(snapshot.style)
        .with_items(items);
    description.supplementary_items_by_kind = snapshot.supplementary_items_by_kind.clone();
    description
}

impl SectionMetricsSource for ComposedMetrics {
    fn number_of_sections(&self) -> usize {
        self.children.iter().map(|child| child.mapping.section_count).sum()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.child_for_global_section(section)
            .map_or(0, |(child, local)| child.source.number_of_items(local))
    }

    fn section_metrics(&self, section: usize) -> Option<&DataSourceSectionMetrics> {
        (section < self.number_of_sections()).then_some(&self.default_metrics)
    }

    fn global_metrics(&self) -> Option<&DataSourceSectionMetrics> {
        self.global.as_ref()
    }

    fn number_of_supplementary_items(&self, kind: &str, section: usize, include_children: bool) -> usize {
        let own = self
            .section_metrics(section)
            .map_or(0, |metrics| metrics.supplementary_items_of_kind(kind).len());
        if !include_children {
            return own;
        }
        own + self
            .child_for_global_section(section)
            .map_or(0, |(child, local)| child.source.number_of_supplementary_items(kind, local, true))
    }

    fn supplementary_item(&self, kind: &str, section: usize, index: usize) -> Option<&SupplementaryItem> {
        let own = self.section_metrics(section)?.supplementary_items_of_kind(kind);
        if let Some(item) = own.get(index) {
            return Some(item);
        }
        let (child, local) = self.child_for_global_section(section)?;
        child.source.supplementary_item(kind, local, index - own.len())
    }

    fn snapshot_metrics(&self, section: usize) -> Option<DataSourceSectionMetrics> {
        let mut enclosing = self.section_metrics(section)?.clone();
        if let Some((child, local)) = self.child_for_global_section(section) {
            if let Some(child_metrics) = child.source.snapshot_metrics(local) {
                enclosing.apply_values(&child_metrics);
            }
        }
        Some(enclosing)
    }
}
