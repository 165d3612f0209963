//! One generation of binder content.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use braid_core::{BindingCategory, Section, SectionItems, SectionUniverse};

use crate::config::SectionDisplayBehavior;
use crate::item::{RowItem, Supplementary};
use crate::registry::RowKind;

/// A caller-supplied display order for sections.
pub(crate) type SectionOrder<S> = Rc<dyn Fn(&S, &S) -> Ordering>;

/// The rows of one section and the mode they were bound in.
#[derive(Debug, Clone)]
pub(crate) struct Rows {
    pub(crate) kind: RowKind,
    pub(crate) items: Vec<RowItem>,
}

/// Everything known about one section.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectionContent {
    pub(crate) rows: Option<Rows>,
    pub(crate) header: Option<Supplementary>,
    pub(crate) footer: Option<Supplementary>,
}

impl SectionContent {
    fn row_count(&self) -> usize {
        self.rows.as_ref().map_or(0, |rows| rows.items.len())
    }

    fn has_supplementary(&self) -> bool {
        self.header.is_some() || self.footer.is_some()
    }
}

/// A header or a footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Header,
    Footer,
}

impl Edge {
    pub(crate) fn category(self) -> BindingCategory {
        match self {
            Self::Header => BindingCategory::Headers,
            Self::Footer => BindingCategory::Footers,
        }
    }

    pub(crate) fn view_name(self) -> &'static str {
        match self {
            Self::Header => "header view",
            Self::Footer => "footer view",
        }
    }
}

/// Content for every section, and which sections are displayed in what
/// order.
#[derive(Debug, Clone)]
pub(crate) struct DataModel<S> {
    sections: HashMap<S, SectionContent>,
    /// Sections in the order content first arrived for them.
    discovered: Vec<S>,
    displayed_override: Option<Vec<S>>,
    displayed: Vec<S>,
}

impl<S> Default for DataModel<S> {
    fn default() -> Self {
        Self {
            sections: HashMap::new(),
            discovered: Vec::new(),
            displayed_override: None,
            displayed: Vec::new(),
        }
    }
}

impl<S: Section> DataModel<S> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, section: S) -> &mut SectionContent {
        if !self.sections.contains_key(&section) {
            self.discovered.push(section.clone());
        }
        self.sections.entry(section).or_default()
    }

    /// Replaces a section's rows. A section holds one row mode at a time.
    pub(crate) fn set_rows(&mut self, section: S, kind: RowKind, items: Vec<RowItem>) {
        self.entry(section).rows = Some(Rows { kind, items });
    }

    /// Makes a section count-only with `count` rows.
    pub(crate) fn set_count(&mut self, section: S, count: usize) {
        let items = (0..count).map(RowItem::counted).collect();
        self.set_rows(section, RowKind::Count, items);
    }

    pub(crate) fn set_supplementary(&mut self, section: S, edge: Edge, content: Supplementary) {
        let entry = self.entry(section);
        match edge {
            Edge::Header => entry.header = Some(content),
            Edge::Footer => entry.footer = Some(content),
        }
    }

    pub(crate) fn supplementary(&self, section: &S, edge: Edge) -> Option<&Supplementary> {
        let content = self.sections.get(section)?;
        match edge {
            Edge::Header => content.header.as_ref(),
            Edge::Footer => content.footer.as_ref(),
        }
    }

    pub(crate) fn rows(&self, section: &S) -> &[RowItem] {
        self.sections
            .get(section)
            .and_then(|content| content.rows.as_ref())
            .map(|rows| rows.items.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn row(&self, section: &S, row: usize) -> Option<&RowItem> {
        self.rows(section).get(row)
    }

    pub(crate) fn rows_mut(&mut self, section: &S) -> Option<&mut Vec<RowItem>> {
        self.sections
            .get_mut(section)
            .and_then(|content| content.rows.as_mut())
            .map(|rows| &mut rows.items)
    }

    /// The section's rows, created empty with `kind` if it has none.
    pub(crate) fn rows_entry(&mut self, section: S, kind: RowKind) -> &mut Vec<RowItem> {
        &mut self
            .entry(section)
            .rows
            .get_or_insert_with(|| Rows {
                kind,
                items: Vec::new(),
            })
            .items
    }

    /// Re-keys a count-only section so row identities equal positions
    /// again after a user edit.
    pub(crate) fn renumber_counted(&mut self, section: &S) {
        if let Some(rows) = self
            .sections
            .get_mut(section)
            .and_then(|content| content.rows.as_mut())
            && rows.kind == RowKind::Count
        {
            rows.items = (0..rows.items.len()).map(RowItem::counted).collect();
        }
    }

    pub(crate) fn row_kind(&self, section: &S) -> Option<RowKind> {
        self.sections
            .get(section)
            .and_then(|content| content.rows.as_ref())
            .map(|rows| rows.kind)
    }

    pub(crate) fn set_displayed_override(&mut self, sections: Option<Vec<S>>) {
        self.displayed_override = sections;
    }

    /// Recomputes the displayed sections.
    pub(crate) fn update_displayed(
        &mut self,
        universe: &SectionUniverse<S>,
        behavior: SectionDisplayBehavior,
        order: Option<&SectionOrder<S>>,
    ) {
        let mut candidates = match (&self.displayed_override, universe) {
            (Some(sections), _) => sections.clone(),
            (None, SectionUniverse::Fixed(sections)) => sections.clone(),
            (None, SectionUniverse::Dynamic) => self.discovered.clone(),
        };
        if self.displayed_override.is_none()
            && let Some(order) = order
        {
            candidates.sort_by(|a, b| order(a, b));
        }

        candidates.retain(|section| {
            let content = self.sections.get(section);
            match behavior {
                SectionDisplayBehavior::ShowAll => true,
                SectionDisplayBehavior::HidesSectionsWithNoCellData => {
                    content.is_some_and(|c| c.row_count() > 0)
                }
                SectionDisplayBehavior::HidesSectionsWithNoData => {
                    content.is_some_and(|c| c.row_count() > 0 || c.has_supplementary())
                }
            }
        });
        self.displayed = candidates;
    }

    pub(crate) fn displayed(&self) -> &[S] {
        &self.displayed
    }

    pub(crate) fn section_at(&self, index: usize) -> Option<&S> {
        self.displayed.get(index)
    }

    pub(crate) fn displayed_index(&self, section: &S) -> Option<usize> {
        self.displayed.iter().position(|s| s == section)
    }

    /// The displayed rows, in the shape the diff engine takes.
    pub(crate) fn snapshot(&self) -> Vec<SectionItems<S, RowItem>> {
        self.displayed
            .iter()
            .map(|section| SectionItems::new(section.clone(), self.rows(section).to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(text: &str) -> Supplementary {
        Supplementary::Title(text.to_owned())
    }

    #[test]
    fn test_fixed_universe_shows_declared_order() {
        let universe = SectionUniverse::fixed(["a", "b", "c"]);
        let mut model = DataModel::new();
        model.set_count("c", 1);
        model.set_count("a", 2);
        model.update_displayed(&universe, SectionDisplayBehavior::ShowAll, None);

        assert_eq!(model.displayed(), &["a", "b", "c"]);
        assert_eq!(model.rows(&"a").len(), 2);
        assert!(model.rows(&"b").is_empty());
    }

    #[test]
    fn test_hides_sections_without_rows() {
        let universe = SectionUniverse::fixed(["a", "b", "c"]);
        let mut model = DataModel::new();
        model.set_count("a", 1);
        model.set_count("b", 0);
        model.set_supplementary("c", Edge::Header, title("C"));

        model.update_displayed(&universe, SectionDisplayBehavior::HidesSectionsWithNoCellData, None);
        assert_eq!(model.displayed(), &["a"]);

        model.update_displayed(&universe, SectionDisplayBehavior::HidesSectionsWithNoData, None);
        assert_eq!(model.displayed(), &["a", "c"]);
    }

    #[test]
    fn test_dynamic_universe_uses_discovery_order_or_comparator() {
        let universe = SectionUniverse::Dynamic;
        let mut model = DataModel::new();
        model.set_count(3, 1);
        model.set_count(1, 1);
        model.set_count(2, 1);

        model.update_displayed(&universe, SectionDisplayBehavior::ShowAll, None);
        assert_eq!(model.displayed(), &[3, 1, 2]);

        let order: SectionOrder<i32> = Rc::new(|a: &i32, b: &i32| a.cmp(b));
        model.update_displayed(&universe, SectionDisplayBehavior::ShowAll, Some(&order));
        assert_eq!(model.displayed(), &[1, 2, 3]);
    }

    #[test]
    fn test_override_wins() {
        let universe = SectionUniverse::fixed(["a", "b"]);
        let mut model = DataModel::new();
        model.set_displayed_override(Some(vec!["b"]));
        model.update_displayed(&universe, SectionDisplayBehavior::ShowAll, None);
        assert_eq!(model.displayed(), &["b"]);
        assert_eq!(model.section_at(0), Some(&"b"));
        assert_eq!(model.displayed_index(&"a"), None);
    }

    #[test]
    fn test_snapshot_follows_displayed_order() {
        let universe = SectionUniverse::fixed(["a", "b"]);
        let mut model = DataModel::new();
        model.set_count("b", 2);
        model.update_displayed(&universe, SectionDisplayBehavior::ShowAll, None);

        let snapshot = model.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].section, "a");
        assert!(snapshot[0].items.is_empty());
        assert_eq!(snapshot[1].items.len(), 2);
    }
}
