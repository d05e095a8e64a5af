use gdal::Dataset;
use gdal::vector::{Geometry, LayerAccess};
use url::{Url, form_urlencoded};

use crate::error::Result;

pub const NOMINATIM_SEARCH: &str = "https://nominatim.openstreetmap.org/search/";

/// Percent-encodes `text` for a query value. Spaces become `%20` and `/` is kept, so
/// `Berlin Mitte` is sent as `Berlin%20Mitte`.
pub fn quote(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace('+', "%20")
        .replace("%2F", "/")
        .replace("%7E", "~")
}

/// Nominatim search URL returning GeoJSON results with polygon outlines for `place`.
pub fn search_url(place: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "{}?q={}&format=geojson&polygon_geojson=1",
        NOMINATIM_SEARCH,
        quote(place)
    ))?)
}

/// Geometries of all OpenStreetMap places matching `place`.
///
/// The request is made by GDAL's GeoJSON driver, without retries or a timeout.
pub fn search_osm(place: &str) -> Result<Vec<Geometry>> {
    let url = search_url(place)?;
    log::info!("Searching OpenStreetMap: {}", url);

    let dataset = Dataset::open(url.as_str())?;
    let mut geometries = Vec::new();
    for mut layer in dataset.layers() {
        for feature in layer.features() {
            if let Some(geometry) = feature.geometry() {
                geometries.push(geometry.clone());
            }
        }
    }

    log::debug!("{} results for {:?}", geometries.len(), place);
    Ok(geometries)
}
