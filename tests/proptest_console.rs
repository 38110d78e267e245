//! Property-based tests for filtering, selection and navigation.
//!
//! Uses proptest to check the console invariants over generated rows,
//! filter texts and selection sequences.

use konto_console::console::ConsoleState;
use konto_console::filter::{matches, RowFilter};
use konto_console::model::{Role, Row, Section, SectionKey, Snapshot};
use konto_console::registry::{section_key_at, sections_for};
use konto_console::rows::descriptor;
use konto_console::selection::SelectionSet;
use proptest::prelude::*;

fn arb_row() -> impl Strategy<Value = Row> {
    prop::collection::vec("[a-zA-ZäöüÄÖÜ@. ]{0,12}", 5)
}

fn arb_users() -> impl Strategy<Value = Section> {
    prop::collection::vec(arb_row(), 0..30).prop_map(|rows| {
        Section::new(
            &["name", "email", "rechte", "pubkey", "fingerprint"],
            rows.into_iter().enumerate().map(|(i, mut row)| {
                // Unique identity column.
                row[1] = format!("{}-{i}", row[1]);
                (i.to_string(), row)
            }),
        )
    })
}

fn arb_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,2}", 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// A row matches iff some field contains the needle, ignoring case.
    #[test]
    fn filter_matches_some_field(row in arb_row(), needle in "[a-zA-Z]{0,3}") {
        let expected = needle.is_empty()
            || row.iter().any(|f| f.to_lowercase().contains(&needle.to_lowercase()));
        prop_assert_eq!(matches(&row, Some(&needle)), expected);
        prop_assert!(matches(&row, None));
    }

    /// Changing the case of the needle never changes the outcome.
    #[test]
    fn filter_is_case_insensitive(row in arb_row(), needle in "[a-zA-Z]{1,3}") {
        let lower = RowFilter::new(Some(&needle.to_lowercase()));
        let upper = RowFilter::new(Some(&needle.to_uppercase()));
        prop_assert_eq!(lower.matches(&row), upper.matches(&row));
    }

    /// Adding ids in any order, any number of times, gives the same set.
    #[test]
    fn selection_ignores_order_and_repeats(ids in arb_ids()) {
        let forward: SelectionSet = ids.iter().cloned().collect();
        let mut backward = SelectionSet::new();
        for id in ids.iter().rev() {
            backward.add(id.clone());
            backward.add(id.clone());
        }

        prop_assert_eq!(&forward, &backward);
        let mut expected = ids.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(forward.as_slice(), expected.as_slice());
    }

    /// Removing what was added restores the previous set.
    #[test]
    fn selection_add_remove_restores(ids in arb_ids(), extra in "[f-h]{1,2}") {
        let mut set: SelectionSet = ids.iter().cloned().collect();
        let before = set.clone();
        set.add(extra.clone());
        prop_assert!(set.contains(&extra));
        set.remove(&extra);
        prop_assert_eq!(set, before);
    }

    /// Select-all picks exactly the visible rows.
    #[test]
    fn select_all_is_visible_subset(section in arb_users(), needle in "[a-z]{0,2}") {
        let descriptor = descriptor(Role::Admin, SectionKey::Users);
        let filter = Some(needle.as_str()).filter(|n| !n.is_empty());
        let mut set = SelectionSet::from_iter(["stale-id"]);
        set.select_all_visible(&section, &descriptor, filter);

        let visible: Vec<String> = section
            .iter()
            .filter(|(_, row)| matches(row, filter))
            .map(|(key, row)| descriptor.row_id(key, row))
            .collect();

        prop_assert_eq!(set.len(), visible.len());
        for id in &visible {
            prop_assert!(set.contains(id));
        }
        prop_assert!(!set.contains("stale-id"));
    }

    /// Navigation always clears filter and selection, even to the same index.
    #[test]
    fn navigation_resets(
        section in arb_users(),
        first in 0usize..8,
        second in 0usize..8,
        needle in "[a-z]{1,2}",
    ) {
        let snapshot = Snapshot::empty(Role::Admin).with_section(SectionKey::Users, section);
        let mut state = ConsoleState::new(snapshot, None);

        state.change_section(first);
        state.set_filter(Some(&needle));
        state.select_all_visible();
        state.select("manual");
        state.change_section(second);

        prop_assert_eq!(state.filter(), None);
        prop_assert!(state.selection().is_empty());
        prop_assert_eq!(state.active_key(), section_key_at(Role::Admin, second));
    }

    /// Indexes past the end resolve to the empty section for every role.
    #[test]
    fn out_of_range_is_empty(offset in 0usize..1000) {
        for role in Role::ALL {
            let index = sections_for(role).len() + offset;
            prop_assert_eq!(section_key_at(role, index), SectionKey::Empty);
            prop_assert!(descriptor(role, SectionKey::Empty).is_empty());
        }
    }
}

mod examples {
    use super::*;

    #[test]
    fn filter_reference_cases() {
        let row: Row = vec!["Anna Muster".into(), "anna@example.com".into()];
        assert!(matches(&row, Some("MUSTER")));
        assert!(!matches(&row, Some("xyz")));
        assert!(matches(&row, Some("")));
        assert!(matches(&row, None));
    }
}
