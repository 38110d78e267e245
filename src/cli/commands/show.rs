//! Show command implementation.
//!
//! Loads a snapshot file and renders one section through the console
//! state, applying filter and selection the same way the console does.

use crate::api::load_snapshot;
use crate::cli::{Cli, ShowArgs};
use crate::console::ConsoleState;
use crate::error::Result;

use super::{print_view, resolve_section};

/// Run the show command.
pub fn run(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let mut state = ConsoleState::new(snapshot, cli.auth());

    if let Some(section) = &args.section {
        let index = resolve_section(&state, section)?;
        state.change_section(index);
    }
    state.set_filter(args.filter.as_deref());

    if args.select_all {
        state.select_all_visible();
    } else {
        for id in &args.select {
            state.select(id);
        }
    }

    print_view(&state, cli.json, args.width)
}
