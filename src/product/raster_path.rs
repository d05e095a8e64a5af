use std::fmt;
use std::path::PathBuf;

/// Location of a single band raster, either on disk or inside a product archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterPath {
    File(PathBuf),
    Archive { archive: PathBuf, entry: String },
}

impl RasterPath {
    /// Path understood by GDAL's virtual filesystem.
    pub fn gdal_path(&self) -> PathBuf {
        match self {
            RasterPath::File(path) => path.clone(),
            RasterPath::Archive { archive, entry } => {
                PathBuf::from(format!("/vsizip/{}/{}", archive.display(), entry))
            }
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            RasterPath::File(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default(),
            RasterPath::Archive { entry, .. } => super::entry_file_name(entry),
        }
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, RasterPath::Archive { .. })
    }
}

// Archive members are written in the `zip+file://<archive>!/<entry>` form
impl fmt::Display for RasterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterPath::File(path) => write!(f, "{}", path.display()),
            RasterPath::Archive { archive, entry } => {
                write!(f, "zip+file://{}!/{}", archive.display(), entry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_display_uses_zip_scheme() {
        let path = RasterPath::Archive {
            archive: PathBuf::from("/data/S2A_MSIL2A.zip"),
            entry: "S2A_MSIL2A.SAFE/GRANULE/IMG_DATA/R10m/T32UQD_B02_10m.jp2".to_string(),
        };

        assert_eq!(
            path.to_string(),
            "zip+file:///data/S2A_MSIL2A.zip!/S2A_MSIL2A.SAFE/GRANULE/IMG_DATA/R10m/T32UQD_B02_10m.jp2"
        );
        assert_eq!(
            path.gdal_path(),
            PathBuf::from(
                "/vsizip//data/S2A_MSIL2A.zip/S2A_MSIL2A.SAFE/GRANULE/IMG_DATA/R10m/T32UQD_B02_10m.jp2"
            )
        );
        assert_eq!(path.file_name(), "T32UQD_B02_10m.jp2");
        assert!(path.is_archived());
    }

    #[test]
    fn test_file_display_is_unchanged() {
        let path = RasterPath::File(PathBuf::from("/data/S2A.SAFE/T32UQD_B03.jp2"));
        assert_eq!(path.to_string(), "/data/S2A.SAFE/T32UQD_B03.jp2");
        assert_eq!(path.gdal_path(), PathBuf::from("/data/S2A.SAFE/T32UQD_B03.jp2"));
        assert_eq!(path.file_name(), "T32UQD_B03.jp2");
        assert!(!path.is_archived());
    }
}
