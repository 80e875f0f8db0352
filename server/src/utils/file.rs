//! File and path helpers for command-line input

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Expand `~` and make relative paths absolute against the working directory
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(&rest[1..]),
            None => PathBuf::from(path),
        },
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Read an inline argument, or the file it names when prefixed with `@`
///
/// `@~/bodies/users.json` reads that file; anything else is returned as is.
pub fn read_inline_or_file(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let path = expand_path(path);
            tracing::debug!(path = %path.display(), "Reading argument from file");
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => Ok(arg.to_string()),
    }
}
