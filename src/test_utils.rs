use gdal::DriverManager;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const PROBABILITY_ENTRY: &str = "S2A.SAFE/GRANULE/L2A_T32UQD/QI_DATA/MSK_CLDPRB_20m.jp2";

pub const L2A_ENTRIES: &[&str] = &[
    "S2A_MSIL2A_20200415T101021.SAFE/MTD_MSIL2A.xml",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R10m/T32UQD_20200415T101021_B02_10m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R10m/T32UQD_20200415T101021_B03_10m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R10m/T32UQD_20200415T101021_B04_10m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R20m/T32UQD_20200415T101021_B02_20m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R20m/T32UQD_20200415T101021_B8A_20m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/IMG_DATA/R60m/T32UQD_20200415T101021_B02_60m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/QI_DATA/MSK_CLDPRB_20m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/QI_DATA/MSK_CLDPRB_60m.jp2",
    "S2A_MSIL2A_20200415T101021.SAFE/GRANULE/L2A_T32UQD/QI_DATA/T32UQD_B02_preview.png",
];

/// Writes `entries` as a zip archive at `path`.
pub fn write_zip_product(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
}

/// Writes `entries` as files below `root`.
pub fn write_dir_product(root: &Path, entries: &[(&str, &[u8])]) {
    for (name, content) in entries {
        let path: PathBuf = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

pub fn placeholder_entries(names: &[&'static str]) -> Vec<(&'static str, &'static [u8])> {
    names.iter().map(|name| (*name, b"".as_slice())).collect()
}

/// Writes a 4x4 cloud probability GeoTIFF at 20m in EPSG:32632, left half 90%, right half 10%.
pub fn write_probability_raster(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<u8, _>(path, 4, 4, 1)
        .unwrap();
    dataset
        .set_geo_transform(&[600_000.0, 20.0, 0.0, 5_000_000.0, 0.0, -20.0])
        .unwrap();
    dataset
        .set_spatial_ref(&SpatialRef::from_epsg(32632).unwrap())
        .unwrap();

    let values: Vec<u8> = (0..16)
        .map(|i| if i % 4 < 2 { 90 } else { 10 })
        .collect();
    let mut buffer = Buffer::new((4, 4), values);
    dataset
        .rasterband(1)
        .unwrap()
        .write((0, 0), (4, 4), &mut buffer)
        .unwrap();
}

/// The probability raster of [`write_probability_raster`] as file bytes, for zipping.
pub fn probability_raster_bytes() -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MSK_CLDPRB_20m.tif");
    write_probability_raster(&path);
    fs::read(path).unwrap()
}

/// A zipped product at `path` holding only the 20m cloud probability raster.
pub fn write_zip_probability_product(path: &Path) {
    let raster = probability_raster_bytes();
    write_zip_product(path, &[(PROBABILITY_ENTRY, raster.as_slice())]);
}
