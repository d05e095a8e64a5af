use super::{ProductSource, RasterPath};
use crate::error::Result;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A product that has already been extracted to a directory tree (e.g. a `.SAFE` folder).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        name.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl ProductSource for DirectorySource {
    fn location(&self) -> &Path {
        &self.root
    }

    fn list_entries(&self) -> Result<Vec<String>> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            // Entries are always under the root we walked from
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };

            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(name);
        }

        log::debug!(
            "Found {} files below {}",
            entries.len(),
            self.root.display()
        );
        Ok(entries)
    }

    fn open_entry(&self, name: &str) -> Result<Box<dyn Read>> {
        let file = File::open(self.entry_path(name))?;
        Ok(Box::new(file))
    }

    fn raster_path(&self, name: &str) -> RasterPath {
        RasterPath::File(self.entry_path(name))
    }

    fn local_path(&self, name: &str, _scratch: &Path) -> Result<PathBuf> {
        let path = self.entry_path(name);
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
            .into());
        }
        Ok(path)
    }
}
