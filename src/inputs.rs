//! Expansion of command-line input arguments into file paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::InputError;

/// File extensions picked up when an input names a directory.
pub const DATA_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Expand inputs into a list of files.
///
/// - An existing file is taken as is.
/// - A directory contributes every file below it with a [`DATA_EXTENSIONS`] extension,
///   sorted by path.
/// - Anything else is a glob pattern; its matches are sorted by path.
///
/// Argument order is preserved across inputs. Every input must yield at least one file.
pub fn resolve_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let path = Path::new(input);

        let found = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            walk_dir(path)?
        } else {
            expand_glob(input)?
        };

        if found.is_empty() {
            return Err(InputError::NoMatch(input.to_string()));
        }
        tracing::debug!(input, files = found.len(), "resolved input");
        files.extend(found);
    }
    Ok(files)
}

fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_data_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, InputError> {
    let paths = glob::glob(pattern).map_err(|source| InputError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for path in paths {
        let path = path?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_data_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DATA_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}
