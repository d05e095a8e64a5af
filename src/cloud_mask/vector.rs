use gdal::Dataset;
use gdal::vector::{Geometry, LayerAccess, OGRwkbGeometryType};
use gdal::{DriverManager, raster::rasterize};
use std::fs;
use std::path::Path;

use super::RasterMask;
use crate::error::{Error, Result};
use crate::product::ProductSource;
use crate::window::GeoTransform;

pub const CLOUD_MASK_SUFFIX: &str = "MSK_CLOUDS_B00.gml";

/// Union of all cloud polygons recorded in the product's `MSK_CLOUDS_B00.gml`.
///
/// A mask without any features is a valid product state and yields an empty polygon. A
/// product without the mask file is an error.
pub fn vector_cloud_mask(source: &dyn ProductSource) -> Result<Geometry> {
    let entries = source.list_entries()?;
    let entry = entries
        .iter()
        .find(|name| name.ends_with(CLOUD_MASK_SUFFIX))
        .ok_or_else(|| Error::MissingEntry {
            product: source.location().display().to_string(),
            suffix: CLOUD_MASK_SUFFIX.to_string(),
        })?;

    // OGR needs a real file, so archive members are extracted first
    let scratch = tempfile::tempdir()?;
    let local = source.local_path(entry, scratch.path())?;

    let mask = read_mask_file(&local)?;
    log::info!("Read cloud mask from {}", entry);
    Ok(mask)
}

fn read_mask_file(path: &Path) -> Result<Geometry> {
    let document = fs::read_to_string(path)?;
    if !has_mask_features(&document) {
        log::debug!("{} records no clouds", path.display());
        return empty_mask();
    }

    let dataset = Dataset::open(path)?;
    let mut geometries = Vec::new();
    for mut layer in dataset.layers() {
        for feature in layer.features() {
            if let Some(geometry) = feature.geometry() {
                geometries.push(geometry.clone());
            }
        }
    }

    log::debug!("Cloud mask has {} polygons", geometries.len());
    union_all(geometries)
}

/// Whether a GML mask document lists any feature. Only an `eop:Mask` whose
/// `eop:maskMembers` element is missing or empty counts as featureless; any other document
/// is left to OGR.
pub fn has_mask_features(document: &str) -> bool {
    if !document.contains("<eop:Mask ") && !document.contains("<eop:Mask>") {
        return true;
    }

    match document.find("<eop:maskMembers") {
        None => false,
        Some(start) => {
            let rest = &document[start..];
            if rest.starts_with("<eop:maskMembers/>") {
                return false;
            }
            let body = rest
                .find('>')
                .map(|end| &rest[end + 1..])
                .unwrap_or_default();
            let body = body
                .find("</eop:maskMembers>")
                .map(|end| &body[..end])
                .unwrap_or(body);
            !body.trim().is_empty()
        }
    }
}

pub fn empty_mask() -> Result<Geometry> {
    Ok(Geometry::empty(OGRwkbGeometryType::wkbPolygon)?)
}

/// Union of `geometries`, or an empty polygon when there are none.
///
/// Invalid polygons and unions OGR cannot compute are errors, so no cloud is ever dropped
/// from the mask.
pub fn union_all(geometries: Vec<Geometry>) -> Result<Geometry> {
    if let Some(index) = geometries.iter().position(|g| !g.is_valid()) {
        return Err(Error::InvalidGeometry { index });
    }

    let mut iter = geometries.into_iter().enumerate();
    let Some((_, first)) = iter.next() else {
        return empty_mask();
    };

    let mut merged = first;
    for (index, geometry) in iter {
        // OGR returns no geometry when GEOS fails on the pair
        merged = merged
            .union(&geometry)
            .ok_or(Error::Union { index })?;
    }

    Ok(merged)
}

/// Burns `mask` onto a `shape` (rows, cols) grid georeferenced by `transform`. Cloud pixels
/// are `true`.
pub fn rasterize_mask(
    mask: &Geometry,
    shape: (usize, usize),
    transform: GeoTransform,
) -> Result<RasterMask> {
    let (rows, cols) = shape;
    if mask.is_empty() {
        return Ok(RasterMask::new(vec![false; rows * cols], cols, rows, transform));
    }

    let driver = DriverManager::get_driver_by_name("MEM")?;
    let mut dataset = driver.create_with_band_type::<u8, _>("", cols, rows, 1)?;
    dataset.set_geo_transform(&transform)?;

    rasterize(&mut dataset, &[1], &[mask.clone()], &[1.0], None)?;

    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<u8>((0, 0), (cols, rows), (cols, rows), None)?;
    let data = buffer.data().iter().map(|&v| v != 0).collect();

    Ok(RasterMask::new(data, cols, rows, transform))
}
