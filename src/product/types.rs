use super::RasterPath;
use crate::error::Result;

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    Directory,
    Archive,
}

pub trait ProductSource {
    /// Location the product was opened from.
    fn location(&self) -> &Path;

    /// All file entries of the product, as `/`-separated paths relative to its root.
    fn list_entries(&self) -> Result<Vec<String>>;

    fn open_entry(&self, name: &str) -> Result<Box<dyn Read>>;

    /// Address of an entry that GDAL (and the `zip+file://` convention) can resolve.
    fn raster_path(&self, name: &str) -> RasterPath;

    /// Returns a path on the local filesystem holding the entry's content, copying the entry
    /// below `scratch` when it is not directly addressable.
    fn local_path(&self, name: &str, scratch: &Path) -> Result<PathBuf> {
        let target = name
            .split('/')
            .filter(|part| !part.is_empty() && *part != "..")
            .fold(scratch.to_path_buf(), |acc, part| acc.join(part));

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut reader = self.open_entry(name)?;
        let mut file = File::create(&target)?;
        io::copy(&mut reader, &mut file)?;

        Ok(target)
    }
}
