use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to walk product directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No entry ending with `{suffix}` found in {product}")]
    MissingEntry { product: String, suffix: String },

    #[error("Could not parse an acquisition date from `{name}`")]
    BandDate { name: String },

    #[error("Cloud polygon {index} is not a valid geometry")]
    InvalidGeometry { index: usize },

    #[error("Failed to merge cloud polygon {index} into the mask")]
    Union { index: usize },

    #[error("Target resolution {target}m is not an integer subdivision of {native}m")]
    ResolutionRatio { native: u32, target: u32 },

    #[error("Area of interest does not overlap the raster")]
    EmptyWindow,
}

pub type Result<T> = std::result::Result<T, Error>;
