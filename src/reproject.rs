use gdal::raster::{GdalType, reproject};
use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::{Dataset, DriverManager};
use std::path::Path;

use crate::error::Result;
use crate::window::{Bounds, GeoTransform};

/// North-up grid covering `bounds` with square pixels and roughly the same number of pixels
/// as a `size` (width, height) source.
pub fn default_grid(size: (usize, usize), bounds: &Bounds) -> (GeoTransform, usize, usize) {
    let pixels = (size.0.max(1) * size.1.max(1)) as f64;
    let resolution = (bounds.width() * bounds.height() / pixels).sqrt();

    let width = ((bounds.width() / resolution).ceil() as usize).max(1);
    let height = ((bounds.height() / resolution).ceil() as usize).max(1);

    let geotransform = [bounds.xmin, resolution, 0.0, bounds.ymax, 0.0, -resolution];
    (geotransform, width, height)
}

/// Warps every band of `src` into `target_srs` and writes the result as a GeoTIFF at
/// `dst_path`, using nearest-neighbour resampling.
pub fn reproject_raster<T: GdalType, P: AsRef<Path>>(
    src: &Dataset,
    dst_path: P,
    target_srs: &SpatialRef,
) -> Result<Dataset> {
    let mut target = target_srs.clone();
    target.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

    let mut src_srs = src.spatial_ref()?;
    src_srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);

    let size = src.raster_size();
    let src_bounds = Bounds::of_raster(&src.geo_transform()?, size);

    let transform = CoordTransform::new(&src_srs, &target)?;
    let [xmin, ymin, xmax, ymax] = transform.transform_bounds(
        &[src_bounds.xmin, src_bounds.ymin, src_bounds.xmax, src_bounds.ymax],
        21,
    )?;
    let target_bounds = Bounds {
        xmin,
        xmax,
        ymin,
        ymax,
    };

    let (geotransform, width, height) = default_grid(size, &target_bounds);
    log::info!(
        "Reprojecting {}x{} raster to a {}x{} grid",
        size.0,
        size.1,
        width,
        height
    );

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type::<T, _>(
        dst_path.as_ref(),
        width,
        height,
        src.raster_count(),
    )?;
    dst.set_spatial_ref(&target)?;
    dst.set_geo_transform(&geotransform)?;

    reproject(src, &dst)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdal::raster::Buffer;
    use tempfile::tempdir;

    #[test]
    fn test_default_grid_keeps_pixel_count() {
        let bounds = Bounds::new(0.0, 200.0, 0.0, 100.0).unwrap();
        let (gt, width, height) = default_grid((20, 10), &bounds);

        assert_eq!((width, height), (20, 10));
        assert_eq!(gt, [0.0, 10.0, 0.0, 100.0, 0.0, -10.0]);
    }

    #[test]
    fn test_default_grid_uses_square_pixels() {
        // Target extent is stretched compared to a 10x10 source
        let bounds = Bounds::new(0.0, 400.0, 0.0, 100.0).unwrap();
        let (gt, width, height) = default_grid((10, 10), &bounds);

        assert_eq!(gt[1], -gt[5]);
        assert_eq!((width, height), (20, 5));
    }

    #[test]
    fn test_reproject_utm_to_wgs84() {
        let dir = tempdir().unwrap();
        let driver = DriverManager::get_driver_by_name("MEM").unwrap();
        let mut src = driver.create_with_band_type::<u16, _>("", 10, 10, 1).unwrap();
        src.set_geo_transform(&[500_000.0, 100.0, 0.0, 5_000_000.0, 0.0, -100.0])
            .unwrap();
        src.set_spatial_ref(&SpatialRef::from_epsg(32632).unwrap())
            .unwrap();
        let mut buffer = Buffer::new((10, 10), vec![1000u16; 100]);
        src.rasterband(1)
            .unwrap()
            .write((0, 0), (10, 10), &mut buffer)
            .unwrap();

        let wgs84 = SpatialRef::from_epsg(4326).unwrap();
        let dst = reproject_raster::<u16, _>(&src, dir.path().join("warped.tif"), &wgs84).unwrap();

        let gt = dst.geo_transform().unwrap();
        // UTM zone 32 at 45°N: roughly 9°E
        assert!((8.0..10.0).contains(&gt[0]), "{gt:?}");
        assert!((44.0..46.0).contains(&gt[3]), "{gt:?}");
        assert_eq!(dst.raster_count(), 1);
    }
}
