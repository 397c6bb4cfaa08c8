use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::rubric::domain::rubric::{Rubric, RubricError};

#[derive(Error, Debug)]
pub enum RubricFileError {
    #[error("failed to read rubric {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rubric {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] RubricError),
}

/// Loads a rubric from JSON. Sections missing from the file keep their defaults.
pub fn load(path: &Path) -> Result<Rubric, RubricFileError> {
    let json = fs::read_to_string(path).map_err(|e| RubricFileError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rubric: Rubric = serde_json::from_str(&json).map_err(|e| RubricFileError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    rubric.validate()?;
    log::debug!(
        "Loaded rubric from {} (total weight {})",
        path.display(),
        rubric.total_weight()
    );
    Ok(rubric)
}

/// Writes `rubric` as pretty JSON, creating parent directories as needed.
pub fn save(rubric: &Rubric, path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(rubric)?;
    fs::write(path, json)
}
