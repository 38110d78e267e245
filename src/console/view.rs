//! Render-ready view model of the console.
//!
//! Everything a renderer needs is precomputed here: sidebar entries, column
//! labels and widths, the visible rows with their identity, display cells
//! and selection flag. No rendering toolkit is involved.

use serde::Serialize;

use crate::filter::RowFilter;
use crate::model::{Role, Section, SectionKey};
use crate::registry::SidebarItem;
use crate::rows::SectionDescriptor;
use crate::selection::SelectionSet;
use crate::util::fit_cell;

/// The whole console as the view layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleView {
    /// Operator role.
    pub role: Role,
    /// Active section.
    pub section: SectionKey,
    /// Sidebar entries with the active marker.
    pub sidebar: Vec<SidebarItem>,
    /// Active filter text.
    pub filter: Option<String>,
    /// Number of selected ids, including ones not currently visible.
    pub selected: usize,
    /// Table of the active section.
    pub table: TableView,
}

/// Table of the active section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    /// Column labels.
    pub columns: Vec<&'static str>,
    /// Even column width in percent.
    pub column_width: f64,
    /// Rows passing the filter, in delivery order.
    pub rows: Vec<RowView>,
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Row identity (the selection key).
    pub id: String,
    /// Display cells, one per column.
    pub cells: Vec<String>,
    /// Whether the row is selected.
    pub selected: bool,
}

impl TableView {
    /// Build the table for one section.
    ///
    /// `section` is `None` when the snapshot has no dataset for the key;
    /// that renders as the descriptor's columns with no rows.
    #[must_use]
    pub fn build(
        descriptor: &SectionDescriptor,
        section: Option<&Section>,
        filter: Option<&str>,
        selection: &SelectionSet,
    ) -> Self {
        if descriptor.is_empty() {
            return Self::default();
        }

        let filter = RowFilter::new(filter);
        let pass_all = filter.is_pass_all();
        let rows = section
            .into_iter()
            .flat_map(Section::iter)
            .filter(|(_, row)| pass_all || filter.matches(row))
            .map(|(key, row)| {
                let id = descriptor.row_id(key, row);
                RowView {
                    selected: selection.contains(&id),
                    cells: descriptor.project(row),
                    id,
                }
            })
            .collect();

        Self {
            columns: descriptor.columns().to_vec(),
            column_width: descriptor.column_width(),
            rows,
        }
    }

    /// Whether no rows are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as fixed-width text, one line per row, with a `*` marking
    /// selected rows.
    #[must_use]
    pub fn to_text(&self, total_width: usize) -> String {
        if self.columns.is_empty() {
            return String::new();
        }
        let width = (total_width.saturating_sub(2) / self.columns.len()).max(4);

        let mut out = String::new();
        out.push_str("  ");
        out.push_str(&text_line(self.columns.iter().copied(), width));
        out.push('\n');
        for row in &self.rows {
            out.push_str(if row.selected { "* " } else { "  " });
            out.push_str(&text_line(row.cells.iter().map(String::as_str), width));
            out.push('\n');
        }
        out
    }
}

fn text_line<'a>(cells: impl Iterator<Item = &'a str>, width: usize) -> String {
    cells
        .map(|c| fit_cell(c, width - 1))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::descriptor;
    use pretty_assertions::assert_eq;

    fn districts() -> Section {
        let row = |f: [&str; 3]| f.iter().map(|v| (*v).to_string()).collect::<Vec<_>>();
        Section::new(
            &["land", "amtsgericht", "bezirk"],
            [
                ("0", row(["NRW", "Köln", "Deutz"])),
                ("1", row(["BYN", "München", "Au"])),
            ],
        )
    }

    fn ids(table: &TableView) -> Vec<&str> {
        table.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_blank_filter_shows_every_row() {
        let d = descriptor(Role::Admin, SectionKey::Districts);
        let section = districts();
        let selection = SelectionSet::from_iter(["BYN/München/Au"]);

        for filter in [None, Some("")] {
            let table = TableView::build(&d, Some(&section), filter, &selection);
            assert_eq!(ids(&table), ["NRW/Köln/Deutz", "BYN/München/Au"]);
            assert!(table.rows[1].selected);
        }

        let table = TableView::build(&d, Some(&section), Some("MÜNCHEN"), &selection);
        assert_eq!(ids(&table), ["BYN/München/Au"]);
    }

    #[test]
    fn test_missing_dataset_keeps_columns() {
        let d = descriptor(Role::Admin, SectionKey::Districts);
        let table = TableView::build(&d, None, None, &SelectionSet::new());
        assert_eq!(table.columns, ["Land", "Amtsgericht", "Bezirk"]);
        assert!(table.is_empty());
    }
}
