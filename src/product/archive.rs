use super::{ProductSource, RasterPath};
use crate::error::Result;

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// A product still packed in the `.zip` archive it was downloaded as.
///
/// The archive is reopened for every operation so no file handle outlives a call.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    archive: PathBuf,
}

impl ArchiveSource {
    pub fn new<P: AsRef<Path>>(archive: P) -> Result<Self> {
        let archive = std::path::absolute(archive.as_ref())?;
        Ok(Self { archive })
    }

    fn open_archive(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.archive)?;
        Ok(ZipArchive::new(file)?)
    }
}

impl ProductSource for ArchiveSource {
    fn location(&self) -> &Path {
        &self.archive
    }

    fn list_entries(&self) -> Result<Vec<String>> {
        let archive = self.open_archive()?;
        let entries: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();

        log::debug!(
            "Found {} entries in {}",
            entries.len(),
            self.archive.display()
        );
        Ok(entries)
    }

    fn open_entry(&self, name: &str) -> Result<Box<dyn Read>> {
        let mut archive = self.open_archive()?;
        let mut entry = archive.by_name(name)?;

        let mut buffer = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buffer)?;

        Ok(Box::new(Cursor::new(buffer)))
    }

    fn raster_path(&self, name: &str) -> RasterPath {
        RasterPath::Archive {
            archive: self.archive.clone(),
            entry: name.to_string(),
        }
    }
}
