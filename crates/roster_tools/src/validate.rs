//! Army book loading and validation.

use std::path::Path;

use roster_core::data::{ArmyBook, ArmyBookRegistry};

use crate::error::{ToolError, ToolResult};

fn read_file(path: &Path) -> ToolResult<String> {
    std::fs::read_to_string(path).map_err(|e| ToolError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse and validate an army book from RON text.
///
/// `origin` names the source in error messages.
pub fn parse_army_book(origin: &str, contents: &str) -> ToolResult<ArmyBook> {
    let book: ArmyBook = ron::from_str(contents).map_err(|e| ToolError::Parse {
        path: origin.to_string(),
        source: e,
    })?;

    let errors = book.validate();
    if !errors.is_empty() {
        return Err(ToolError::Validation {
            book: book.uid,
            errors,
        });
    }
    Ok(book)
}

/// Load a single army book from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_army_book_from_file(path: &Path) -> ToolResult<ArmyBook> {
    let contents = read_file(path)?;
    let book = parse_army_book(&path.display().to_string(), &contents)?;

    tracing::info!(
        "Loaded army book '{}' with {} units, {} upgrade packages",
        book.name,
        book.units.len(),
        book.upgrade_packages.len()
    );

    Ok(book)
}

/// Load army books from files or directories of `.ron` files.
///
/// # Errors
///
/// Returns the first load failure, or a duplicate-uid error.
pub fn load_army_books(paths: &[impl AsRef<Path>]) -> ToolResult<ArmyBookRegistry> {
    let mut registry = ArmyBookRegistry::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| ToolError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| ToolError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let file = entry.path();
                if file.extension().is_some_and(|ext| ext == "ron") {
                    files.push(file);
                }
            }
            files.sort();
            for file in files {
                registry.register(load_army_book_from_file(&file)?)?;
            }
        } else {
            registry.register(load_army_book_from_file(path)?)?;
        }
    }

    tracing::info!("Loaded {} army books", registry.len());

    Ok(registry)
}

/// Validate every army book in the given files or directories.
///
/// Unlike [`load_army_books`], every file is checked; the failures are
/// returned together.
pub fn validate_paths(paths: &[impl AsRef<Path>]) -> Vec<ToolError> {
    let mut failures = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let files = if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut files: Vec<_> = entries
                        .filter_map(|entry| entry.ok().map(|e| e.path()))
                        .filter(|file| file.extension().is_some_and(|ext| ext == "ron"))
                        .collect();
                    files.sort();
                    files
                }
                Err(e) => {
                    failures.push(ToolError::Io {
                        path: path.display().to_string(),
                        source: e,
                    });
                    continue;
                }
            }
        } else {
            vec![path.to_path_buf()]
        };

        for file in files {
            if let Err(e) = load_army_book_from_file(&file) {
                tracing::error!("{e}");
                failures.push(e);
            }
        }
    }
    failures
}
