//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod config;
pub mod export;
pub mod send;
pub mod show;

use std::io::{self, Write};

use crate::console::{ConsoleState, ConsoleView};
use crate::error::{KontoError, Result};
use crate::model::SectionKey;
use crate::registry;

/// Resolve a section argument (sidebar index or wire key) for the session role.
pub fn resolve_section(state: &ConsoleState, arg: &str) -> Result<usize> {
    let role = state.role();
    if let Ok(index) = arg.trim().parse::<usize>() {
        return Ok(index);
    }
    SectionKey::from_wire(arg.trim())
        .and_then(|key| registry::index_of(role, key))
        .ok_or_else(|| {
            let known: Vec<&str> = registry::sections_for(role)
                .iter()
                .map(|k| k.as_str())
                .collect();
            KontoError::invalid_argument(
                "section",
                format!("'{arg}' is not a section for {role} (one of: {})", known.join(", ")),
            )
        })
}

/// Print the active section of a console, as text or JSON.
pub fn print_view(state: &ConsoleState, json: bool, width: usize) -> Result<()> {
    let view = state.view();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let written = if json {
        let json = serde_json::to_string_pretty(&view)?;
        writeln!(out, "{json}")
    } else {
        write_text_view(&mut out, &view, width)
    };

    match written {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
            Err(KontoError::io("Failed to write output", e))
        }
        _ => Ok(()),
    }
}

fn write_text_view(out: &mut impl Write, view: &ConsoleView, width: usize) -> io::Result<()> {
    for item in &view.sidebar {
        let marker = if item.active { ">" } else { " " };
        writeln!(out, "{marker} [{}] {}", item.index, item.label)?;
    }
    writeln!(out)?;

    if view.section.is_empty() {
        writeln!(out, "(no section selected)")?;
        return Ok(());
    }

    write!(out, "{}", view.table.to_text(width))?;
    writeln!(
        out,
        "\n{} rows shown, {} selected{}",
        view.table.rows.len(),
        view.selected,
        view.filter
            .as_deref()
            .map(|f| format!(", filter \"{f}\""))
            .unwrap_or_default()
    )
}
