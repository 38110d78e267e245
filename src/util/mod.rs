//! Utility functions shared across the crate:
//! - Atomic file writes for configuration and downloads
//! - Masking of secrets in operator-facing output
//! - Fitting cell text into fixed-width table columns

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{KontoError, Result};

/// Atomically write content to a file.
///
/// The content goes to a temporary file in the target directory first and
/// is then renamed over the target, so the old file stays intact if any
/// step fails.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be determined or
/// created, or if writing or renaming the temporary file fails.
///
/// # Example
///
/// ```rust,no_run
/// use konto_console::util::atomic_write;
///
/// atomic_write("config.toml", b"[server]\nurl = \"https://grundbuch.example\"").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => {
            return Err(KontoError::io(
                format!("No parent directory for {}", path.display()),
                io::Error::from(io::ErrorKind::InvalidInput),
            ))
        }
    };

    std::fs::create_dir_all(parent)
        .map_err(|e| KontoError::io(format!("Cannot create {}", parent.display()), e))?;

    // Same directory keeps the rename on one filesystem.
    let staging_failed = |e| KontoError::io(format!("Cannot stage {}", path.display()), e);
    let mut staged = NamedTempFile::new_in(parent).map_err(staging_failed)?;
    staged
        .write_all(content)
        .and_then(|()| staged.flush())
        .map_err(staging_failed)?;

    staged
        .persist(path)
        .map_err(|e| KontoError::io(format!("Cannot replace {}", path.display()), e.error))?;
    Ok(())
}

/// Mask a secret for display, keeping at most the first four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

/// Fit text into `width` characters, padding or cutting with an ellipsis.
#[must_use]
pub fn fit_cell(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{text:<width$}")
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
