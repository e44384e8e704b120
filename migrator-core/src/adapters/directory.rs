//! Migrations directory - flat listing of migration files

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::MigrationFile;

/// A flat directory of migration files
#[derive(Debug, Clone)]
pub struct MigrationDirectory {
    path: PathBuf,
}

impl MigrationDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List migration files sorted by name
    ///
    /// Subdirectories and hidden entries (leading `.`) are skipped. A missing
    /// or unreadable directory is an error, never an empty listing.
    pub fn list(&self) -> Result<Vec<MigrationFile>> {
        let entries = fs::read_dir(&self.path).map_err(|source| self.dir_error(source))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| self.dir_error(source))?;
            let file_type = entry.file_type().map_err(|source| self.dir_error(source))?;

            let name = entry
                .file_name()
                .into_string()
                .map_err(|raw| Error::InvalidFileName(raw.to_string_lossy().into_owned()))?;

            if name.starts_with('.') {
                debug!(entry = %name, "Skipping hidden entry in migrations directory");
                continue;
            }
            // Follow symlinks so linked migration files still count
            let is_file = file_type.is_file()
                || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                debug!(entry = %name, "Skipping non-file entry in migrations directory");
                continue;
            }

            files.push(MigrationFile::new(name, entry.path()));
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Read the full text of a migration file
    pub fn read(&self, file: &MigrationFile) -> Result<String> {
        fs::read_to_string(&file.path).map_err(|source| Error::ReadMigration {
            migration: file.name.clone(),
            source,
        })
    }

    fn dir_error(&self, source: std::io::Error) -> Error {
        Error::MigrationsDirectory {
            path: self.path.clone(),
            source,
        }
    }
}
