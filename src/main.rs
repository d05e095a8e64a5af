use clap::Parser;
use std::path::PathBuf;

use sentinel_helpers::bands::resolve_band_paths;
use sentinel_helpers::batch::RasterBatch;
use sentinel_helpers::cloud_mask::{CloudMask, extract_cloud_mask};
use sentinel_helpers::config::Config;
use sentinel_helpers::product::open_product;
use sentinel_helpers::utils::print_reflectance_statistics;

const DEFAULT_CONFIG: &str = "./data/config/product.json";

#[derive(Parser)]
#[command(name = "sentinel-helpers")]
#[command(about = "List the band rasters of a Sentinel-2 product and summarize its cloud mask")]
struct Args {
    /// JSON configuration naming the product, bands and cloud mask mode
    #[arg(default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::from_file(&args.config)?;

    println!("Processing product {}", config.product().display());

    let source = open_product(config.product())?;
    let paths = resolve_band_paths(source.as_ref(), config.bands(), config.resolution())?;
    if paths.is_empty() {
        return Err(format!(
            "No rasters found for bands {:?} in {}",
            config.bands(),
            config.product().display()
        )
        .into());
    }

    for path in &paths {
        println!("  {}", path);
    }

    let batch = RasterBatch::open(&paths, config.close_policy())?;
    print_reflectance_statistics(&paths, batch.handles())?;
    batch.close()?;

    if let Some(mask_config) = config.cloud_mask() {
        let options = mask_config.to_options()?;
        match extract_cloud_mask(source.as_ref(), &options)? {
            CloudMask::Vector(geometry) if geometry.is_empty() => {
                println!("Cloud mask: no clouds recorded");
            }
            CloudMask::Vector(geometry) => {
                println!("Cloud mask: {:.0} m² of clouds", geometry.area());
            }
            CloudMask::Raster(mask) => {
                let (rows, cols) = mask.shape();
                println!(
                    "Cloud mask: {}x{} pixels, {:.1}% cloudy",
                    cols,
                    rows,
                    100.0 * mask.cloudy_fraction()
                );
            }
        }
    }

    Ok(())
}
