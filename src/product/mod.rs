pub mod archive;
pub mod directory;
pub mod raster_path;
pub mod types;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;
pub use raster_path::RasterPath;
pub use types::{ProductKind, ProductSource};

use crate::error::Result;
use std::path::Path;

pub fn product_kind(path: &Path) -> ProductKind {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("zip") => ProductKind::Archive,
        _ => ProductKind::Directory,
    }
}

/// Opens the product at `path` as either a zip archive or an extracted directory tree.
///
/// This is the only place where the two layouts are told apart; everything downstream works
/// through [`ProductSource`].
pub fn open_product<P: AsRef<Path>>(path: P) -> Result<Box<dyn ProductSource>> {
    let path = path.as_ref();
    let source: Box<dyn ProductSource> = match product_kind(path) {
        ProductKind::Archive => Box::new(ArchiveSource::new(path)?),
        ProductKind::Directory => Box::new(DirectorySource::new(path)),
    };

    log::info!("Opened product {}", path.display());
    Ok(source)
}

/// Returns the last `/`-separated component of an entry name.
pub fn entry_file_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}
