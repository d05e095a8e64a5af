use chrono::NaiveDateTime;
use std::path::Path;

use crate::error::{Error, Result};
use crate::product::{ProductSource, RasterPath, entry_file_name, open_product};

pub const RASTER_SUFFIX: &str = ".jp2";

// Blue, green and red, in that order
pub const BGR_BANDS: [&str; 3] = ["B02", "B03", "B04"];

/// The matching policy for band identifiers and resolution tags: plain substring containment
/// on the file name. `B8` therefore also matches `B8A`.
pub fn matches_tag(file_name: &str, tag: &str) -> bool {
    file_name.contains(tag)
}

/// Returns the rasters of `source` belonging to any of `bands`, optionally restricted to a
/// resolution tag such as `"10m"`.
///
/// Results are ordered band by band. A raster whose name matches several requested bands is
/// returned once per match.
pub fn resolve_band_paths<S: AsRef<str>>(
    source: &dyn ProductSource,
    bands: &[S],
    resolution: Option<&str>,
) -> Result<Vec<RasterPath>> {
    let entries = source.list_entries()?;
    let rasters: Vec<&str> = entries
        .iter()
        .map(String::as_str)
        .filter(|entry| entry.ends_with(RASTER_SUFFIX))
        .collect();

    let mut matched: Vec<&str> = bands
        .iter()
        .flat_map(|band| {
            rasters
                .iter()
                .copied()
                .filter(move |raster| matches_tag(entry_file_name(raster), band.as_ref()))
        })
        .collect();

    if let Some(resolution) = resolution {
        matched.retain(|raster| matches_tag(entry_file_name(raster), resolution));
    }

    log::debug!(
        "{} of {} rasters in {} match the requested bands",
        matched.len(),
        rasters.len(),
        source.location().display()
    );

    Ok(matched
        .into_iter()
        .map(|raster| source.raster_path(raster))
        .collect())
}

/// Opens the product at `product` and resolves `bands` in it.
pub fn band_paths<P: AsRef<Path>, S: AsRef<str>>(
    product: P,
    bands: &[S],
    resolution: Option<&str>,
) -> Result<Vec<RasterPath>> {
    let source = open_product(product)?;
    resolve_band_paths(source.as_ref(), bands, resolution)
}

/// Paths to the blue, green and red bands, as used for true-color composites.
pub fn bgr_paths<P: AsRef<Path>>(product: P, resolution: Option<&str>) -> Result<Vec<RasterPath>> {
    band_paths(product, &BGR_BANDS, resolution)
}

/// Parses the acquisition time encoded in a band file name, e.g.
/// `T32UQD_20200415T101021_B02_10m.jp2`.
pub fn band_date(file_name: &str) -> Result<NaiveDateTime> {
    let name = entry_file_name(file_name);
    let parts: Vec<&str> = name.split('_').collect();

    let stamp = parts
        .len()
        .checked_sub(3)
        .and_then(|idx| parts.get(idx))
        .ok_or_else(|| Error::BandDate {
            name: name.to_string(),
        })?;

    NaiveDateTime::parse_from_str(stamp, "%Y%m%dT%H%M%S").map_err(|_| Error::BandDate {
        name: name.to_string(),
    })
}
