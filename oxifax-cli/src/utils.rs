//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A named file could not be opened. Maps to exit code 3.
#[derive(Debug, Error)]
#[error("Error opening \"{}\" for {mode}: {source}", path.display())]
pub struct OpenError {
    pub path: PathBuf,
    pub mode: &'static str,
    #[source]
    pub source: io::Error,
}

/// Open `path` for reading, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, OpenError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| OpenError {
                path: path.to_path_buf(),
                mode: "reading",
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin().lock()))),
    }
}

/// Create `path` for writing, or stdout when no path is given.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>, OpenError> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| OpenError {
                path: path.to_path_buf(),
                mode: "writing",
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Create a progress bar with standard styling.
///
/// Without a known length the bar is a spinner counting rows.
pub fn create_progress_bar(len: Option<u64>, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("█▓▒░ "));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("[{elapsed_precise}] {spinner} {pos} {msg}") {
                pb.set_style(style);
            }
            pb
        }
    }
}

/// Bytes per packed row of `width` pixels.
pub fn row_bytes(width: usize) -> usize {
    width.div_ceil(8)
}
