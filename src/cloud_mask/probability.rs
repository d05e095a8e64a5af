use gdal::Dataset;
use gdal::raster::ResampleAlg;
use gdal::spatial_ref::{AxisMappingStrategy, SpatialRef};
use gdal::vector::Geometry;

use super::RasterMask;
use crate::bands::resolve_band_paths;
use crate::config::Resolution;
use crate::error::{Error, Result};
use crate::product::ProductSource;
use crate::window::{Bounds, PixelWindow, scale_transform};

pub const CLOUD_PROBABILITY_BAND: &str = "MSK_CLDPRB";

/// A geometry, with its spatial reference, that limits which part of a raster is read.
#[derive(Clone)]
pub struct AreaOfInterest {
    geometry: Geometry,
}

impl AreaOfInterest {
    pub fn new(mut geometry: Geometry, mut srs: SpatialRef) -> Self {
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        geometry.set_spatial_ref(srs);
        AreaOfInterest { geometry }
    }

    /// Parses `wkt` in the coordinate system `EPSG:<epsg>`. Geographic coordinates are given
    /// as longitude, latitude.
    pub fn from_wkt(wkt: &str, epsg: u32) -> Result<Self> {
        let geometry = Geometry::from_wkt(wkt)?;
        let srs = SpatialRef::from_epsg(epsg)?;
        Ok(Self::new(geometry, srs))
    }

    /// Bounding box of the area once reprojected into `target`.
    pub fn bounds_in(&self, target: &SpatialRef) -> Result<Bounds> {
        let mut target = target.clone();
        target.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

        let projected = self.geometry.transform_to(&target)?;
        let envelope = projected.envelope();

        Ok(Bounds {
            xmin: envelope.MinX,
            xmax: envelope.MaxX,
            ymin: envelope.MinY,
            ymax: envelope.MaxY,
        })
    }
}

#[derive(Clone)]
pub struct ProbabilityOptions {
    /// Cloud probability, as a fraction in `[0, 1]`, from which a pixel counts as cloudy.
    pub threshold: f64,
    /// Tier the probability band is read from.
    pub resolution: Resolution,
    /// Finer tier to upsample the grid to.
    pub target_resolution: Option<Resolution>,
    pub area_of_interest: Option<AreaOfInterest>,
}

impl ProbabilityOptions {
    pub fn new(threshold: f64) -> Self {
        ProbabilityOptions {
            threshold,
            resolution: Resolution::R20m,
            target_resolution: None,
            area_of_interest: None,
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_target_resolution(mut self, target: Resolution) -> Self {
        self.target_resolution = Some(target);
        self
    }

    pub fn with_area_of_interest(mut self, aoi: AreaOfInterest) -> Self {
        self.area_of_interest = Some(aoi);
        self
    }

    /// Integer factor by which the native grid is upsampled along each axis.
    pub fn upsample_factor(&self) -> Result<usize> {
        let native = self.resolution.meters();
        let Some(target) = self.target_resolution.map(|r| r.meters()) else {
            return Ok(1);
        };

        if target > native || native % target != 0 {
            return Err(Error::ResolutionRatio { native, target });
        }

        Ok((native / target) as usize)
    }
}

/// `true` when a 0-100 scaled probability reaches `threshold` (a 0-1 fraction).
pub fn is_cloudy(probability: f32, threshold: f64) -> bool {
    probability as f64 >= threshold * 100.0
}

/// Reads the product's cloud probability band and thresholds it into a boolean grid.
pub fn probability_cloud_mask(
    source: &dyn ProductSource,
    options: &ProbabilityOptions,
) -> Result<RasterMask> {
    let factor = options.upsample_factor()?;

    let path = resolve_band_paths(
        source,
        &[CLOUD_PROBABILITY_BAND],
        Some(options.resolution.tag()),
    )?
    .into_iter()
    .next()
    .ok_or_else(|| Error::MissingEntry {
        product: source.location().display().to_string(),
        suffix: format!("{}_{}.jp2", CLOUD_PROBABILITY_BAND, options.resolution),
    })?;

    let dataset = Dataset::open(path.gdal_path())?;
    let geotransform = dataset.geo_transform()?;
    let size = dataset.raster_size();

    let window = match &options.area_of_interest {
        Some(aoi) => {
            let bounds = aoi.bounds_in(&dataset.spatial_ref()?)?;
            PixelWindow::from_bounds(&geotransform, &bounds, size).ok_or(Error::EmptyWindow)?
        }
        None => PixelWindow::full(size),
    };

    let out_size = (window.width * factor, window.height * factor);
    log::debug!(
        "Reading {} window {:?} into {}x{}",
        path.file_name(),
        window,
        out_size.0,
        out_size.1
    );

    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<f32>(
        window.offset(),
        window.size(),
        out_size,
        Some(ResampleAlg::Bilinear),
    )?;

    let transform = scale_transform(&window.transform(&geotransform), factor as f64);
    let mask = RasterMask::from_probabilities(
        buffer.data(),
        out_size.0,
        out_size.1,
        options.threshold,
        transform,
    );

    log::info!(
        "Cloud probability mask {}x{}: {:.1}% above {:.2}",
        out_size.0,
        out_size.1,
        100.0 * mask.cloudy_fraction(),
        options.threshold
    );
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ArchiveSource, DirectorySource};
    use crate::test_utils::{
        PROBABILITY_ENTRY, write_probability_raster, write_zip_probability_product,
    };
    use tempfile::tempdir;

    fn product_with_probability() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write_probability_raster(&dir.path().join(PROBABILITY_ENTRY));
        dir
    }

    #[test]
    fn test_threshold() {
        assert!(is_cloudy(80.0, 0.75));
        assert!(!is_cloudy(70.0, 0.75));
        assert!(is_cloudy(75.0, 0.75));
        assert!(is_cloudy(0.0, 0.0));
    }

    #[test]
    fn test_upsample_factor() {
        let options = ProbabilityOptions::new(0.5);
        assert_eq!(options.upsample_factor().unwrap(), 1);

        let options = options.with_target_resolution(Resolution::R10m);
        assert_eq!(options.upsample_factor().unwrap(), 2);

        let options = ProbabilityOptions::new(0.5)
            .with_resolution(Resolution::R60m)
            .with_target_resolution(Resolution::R20m);
        assert_eq!(options.upsample_factor().unwrap(), 3);

        let coarser = ProbabilityOptions::new(0.5).with_target_resolution(Resolution::R60m);
        assert!(matches!(
            coarser.upsample_factor(),
            Err(Error::ResolutionRatio {
                native: 20,
                target: 60
            })
        ));
    }

    #[test]
    fn test_native_resolution_mask() {
        let dir = product_with_probability();
        let source = DirectorySource::new(dir.path());

        let mask = probability_cloud_mask(&source, &ProbabilityOptions::new(0.5)).unwrap();

        assert_eq!(mask.shape(), (4, 4));
        assert_eq!(
            mask.transform(),
            &[600_000.0, 20.0, 0.0, 5_000_000.0, 0.0, -20.0]
        );
        assert_eq!(mask.cloudy_count(), 8);
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(0, 3), Some(false));
    }

    #[test]
    fn test_mask_from_zipped_product() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("S2A_MSIL2A_20200415T101021.zip");
        write_zip_probability_product(&zip_path);
        let source = ArchiveSource::new(&zip_path).unwrap();

        let options = ProbabilityOptions::new(0.5).with_target_resolution(Resolution::R10m);
        let mask = probability_cloud_mask(&source, &options).unwrap();

        assert_eq!(mask.shape(), (8, 8));
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(0, 7), Some(false));
        assert_eq!(
            mask.transform(),
            &[600_000.0, 10.0, 0.0, 5_000_000.0, 0.0, -10.0]
        );
    }

    #[test]
    fn test_upsampled_mask() {
        let dir = product_with_probability();
        let source = DirectorySource::new(dir.path());

        let options = ProbabilityOptions::new(0.5).with_target_resolution(Resolution::R10m);
        let mask = probability_cloud_mask(&source, &options).unwrap();

        assert_eq!(mask.shape(), (8, 8));
        assert_eq!(
            mask.transform(),
            &[600_000.0, 10.0, 0.0, 5_000_000.0, 0.0, -10.0]
        );
        assert_eq!(mask.get(0, 0), Some(true));
        assert_eq!(mask.get(7, 7), Some(false));
    }

    #[test]
    fn test_area_of_interest_window() {
        let dir = product_with_probability();
        let source = DirectorySource::new(dir.path());

        // Covers the two rightmost columns of the top two rows
        let aoi = AreaOfInterest::from_wkt(
            "POLYGON ((600040 4999960, 600080 4999960, 600080 5000000, 600040 5000000, 600040 4999960))",
            32632,
        )
        .unwrap();
        let options = ProbabilityOptions::new(0.5).with_area_of_interest(aoi);
        let mask = probability_cloud_mask(&source, &options).unwrap();

        assert_eq!(mask.shape(), (2, 2));
        assert_eq!(
            mask.transform(),
            &[600_040.0, 20.0, 0.0, 5_000_000.0, 0.0, -20.0]
        );
        assert_eq!(mask.cloudy_count(), 0);
    }

    #[test]
    fn test_disjoint_area_of_interest() {
        let dir = product_with_probability();
        let source = DirectorySource::new(dir.path());

        let aoi = AreaOfInterest::from_wkt(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))",
            32632,
        )
        .unwrap();
        let options = ProbabilityOptions::new(0.5).with_area_of_interest(aoi);
        assert!(matches!(
            probability_cloud_mask(&source, &options),
            Err(Error::EmptyWindow)
        ));
    }

    #[test]
    fn test_missing_probability_band() {
        let dir = product_with_probability();
        let source = DirectorySource::new(dir.path());

        let options = ProbabilityOptions::new(0.5).with_resolution(Resolution::R60m);
        assert!(matches!(
            probability_cloud_mask(&source, &options),
            Err(Error::MissingEntry { .. })
        ));
    }
}
