use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use analysis_core::ExportDocument;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot export into {}: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },
    #[error("failed to write {filename}: {source}")]
    Write {
        filename: String,
        #[source]
        source: io::Error,
    },
}

/// Writes an export under its download name, replacing any previous export.
///
/// The contents are staged in a temp file inside `dir` and renamed into
/// place, so a reader never sees a half-written export.
pub fn write_export(dir: &Path, document: &ExportDocument) -> Result<PathBuf, PersistError> {
    prepare_dir(dir)?;

    let failed = |source: io::Error| PersistError::Write {
        filename: document.filename.clone(),
        source,
    };
    let target = dir.join(&document.filename);
    let mut staged = NamedTempFile::new_in(dir).map_err(failed)?;
    staged
        .write_all(document.contents.as_bytes())
        .map_err(failed)?;
    staged.as_file().sync_all().map_err(failed)?;
    staged.persist(&target).map_err(|err| failed(err.error))?;
    Ok(target)
}

fn prepare_dir(dir: &Path) -> Result<(), PersistError> {
    let rejected = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(rejected("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| rejected(err.to_string()))
        }
        Err(err) => Err(rejected(err.to_string())),
    }
}
