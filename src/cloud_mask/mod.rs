pub mod probability;
pub mod vector;

pub use probability::{
    AreaOfInterest, CLOUD_PROBABILITY_BAND, ProbabilityOptions, is_cloudy, probability_cloud_mask,
};
pub use vector::{CLOUD_MASK_SUFFIX, empty_mask, rasterize_mask, vector_cloud_mask};

use gdal::vector::Geometry;

use crate::error::Result;
use crate::product::ProductSource;
use crate::window::GeoTransform;

/// Which form of cloud mask to extract from a product.
#[derive(Clone)]
pub enum CloudMaskOptions {
    /// Union of the polygons of the GML mask.
    Vector,
    /// The GML mask burnt onto a `shape` (rows, cols) grid.
    RasterizedVector {
        shape: (usize, usize),
        transform: GeoTransform,
    },
    /// Thresholded `MSK_CLDPRB` band.
    Probability(ProbabilityOptions),
}

pub enum CloudMask {
    Vector(Geometry),
    Raster(RasterMask),
}

impl CloudMask {
    pub fn is_empty(&self) -> bool {
        match self {
            CloudMask::Vector(geometry) => geometry.is_empty(),
            CloudMask::Raster(mask) => mask.cloudy_count() == 0,
        }
    }
}

pub fn extract_cloud_mask(
    source: &dyn ProductSource,
    options: &CloudMaskOptions,
) -> Result<CloudMask> {
    match options {
        CloudMaskOptions::Vector => Ok(CloudMask::Vector(vector_cloud_mask(source)?)),
        CloudMaskOptions::RasterizedVector { shape, transform } => {
            let mask = vector_cloud_mask(source)?;
            Ok(CloudMask::Raster(rasterize_mask(&mask, *shape, *transform)?))
        }
        CloudMaskOptions::Probability(options) => {
            Ok(CloudMask::Raster(probability_cloud_mask(source, options)?))
        }
    }
}

/// Boolean cloud grid stored row by row; `true` marks a cloudy pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMask {
    data: Vec<bool>,
    width: usize,
    height: usize,
    transform: GeoTransform,
}

impl RasterMask {
    pub fn new(data: Vec<bool>, width: usize, height: usize, transform: GeoTransform) -> Self {
        debug_assert_eq!(data.len(), width * height);
        RasterMask {
            data,
            width,
            height,
            transform,
        }
    }

    pub fn from_probabilities(
        probabilities: &[f32],
        width: usize,
        height: usize,
        threshold: f64,
        transform: GeoTransform,
    ) -> Self {
        let data = probabilities
            .iter()
            .map(|&p| is_cloudy(p, threshold))
            .collect();
        Self::new(data, width, height, transform)
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn data(&self) -> &[bool] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn cloudy_count(&self) -> usize {
        self.data.iter().filter(|&&cloudy| cloudy).count()
    }

    pub fn cloudy_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.cloudy_count() as f64 / self.data.len() as f64
    }
}
