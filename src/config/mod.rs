use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bands::BGR_BANDS;
use crate::batch::ClosePolicy;
use crate::cloud_mask::{AreaOfInterest, CloudMaskOptions, ProbabilityOptions};
use crate::window::GeoTransform;

pub mod error;
pub use error::ConfigError;

pub mod resolution;
pub use resolution::{Resolution, ResolutionParseError};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AoiConfig {
    pub wkt: String,
    pub epsg: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CloudMaskConfig {
    Vector,
    RasterizedVector {
        shape: (usize, usize),
        transform: GeoTransform,
    },
    Probability {
        threshold: f64,
        resolution: Resolution,
        target_resolution: Option<Resolution>,
        area_of_interest: Option<AoiConfig>,
    },
}

impl CloudMaskConfig {
    /// Builds the extraction options, parsing the area of interest geometry if there is one.
    pub fn to_options(&self) -> crate::Result<CloudMaskOptions> {
        let options = match self {
            CloudMaskConfig::Vector => CloudMaskOptions::Vector,
            CloudMaskConfig::RasterizedVector { shape, transform } => {
                CloudMaskOptions::RasterizedVector {
                    shape: *shape,
                    transform: *transform,
                }
            }
            CloudMaskConfig::Probability {
                threshold,
                resolution,
                target_resolution,
                area_of_interest,
            } => {
                let mut options = ProbabilityOptions::new(*threshold).with_resolution(*resolution);
                if let Some(target) = target_resolution {
                    options = options.with_target_resolution(*target);
                }
                if let Some(aoi) = area_of_interest {
                    options =
                        options.with_area_of_interest(AreaOfInterest::from_wkt(&aoi.wkt, aoi.epsg)?);
                }
                CloudMaskOptions::Probability(options)
            }
        };

        Ok(options)
    }
}

// Validates that each mode carries the parameters it needs.
impl<'de> Deserialize<'de> for CloudMaskConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CloudMaskHelper {
            mode: String,
            target_shape: Option<(usize, usize)>,
            target_transform: Option<GeoTransform>,
            threshold: Option<f64>,
            resolution: Option<String>,
            target_resolution: Option<String>,
            area_of_interest: Option<AoiConfig>,
        }

        fn parse_resolution<E: Error>(value: Option<&str>) -> Result<Option<Resolution>, E> {
            value
                .map(|v| v.parse::<Resolution>())
                .transpose()
                .map_err(|e| E::custom(ConfigError::from(e)))
        }

        let helper = CloudMaskHelper::deserialize(deserializer)?;

        match helper.mode.as_str() {
            "vector" => Ok(CloudMaskConfig::Vector),
            "rasterized_vector" => {
                let shape = helper
                    .target_shape
                    .ok_or_else(|| D::Error::custom(ConfigError::MissingParameter("target_shape")))?;
                let transform = helper.target_transform.ok_or_else(|| {
                    D::Error::custom(ConfigError::MissingParameter("target_transform"))
                })?;
                Ok(CloudMaskConfig::RasterizedVector { shape, transform })
            }
            "probability" => {
                let threshold = helper
                    .threshold
                    .ok_or_else(|| D::Error::custom(ConfigError::MissingParameter("threshold")))?;
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(D::Error::custom(ConfigError::Threshold(threshold)));
                }

                let resolution = parse_resolution::<D::Error>(helper.resolution.as_deref())?;
                let target_resolution =
                    parse_resolution::<D::Error>(helper.target_resolution.as_deref())?;

                Ok(CloudMaskConfig::Probability {
                    threshold,
                    resolution: resolution.unwrap_or(Resolution::R20m),
                    target_resolution,
                    area_of_interest: helper.area_of_interest,
                })
            }
            other => Err(D::Error::custom(ConfigError::UnknownMode(other.to_string()))),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    product: PathBuf,
    #[serde(default = "default_bands")]
    bands: Vec<String>,
    resolution: Option<String>,
    #[serde(default)]
    close_policy: ClosePolicy,
    cloud_mask: Option<CloudMaskConfig>,
}

fn default_bands() -> Vec<String> {
    BGR_BANDS.iter().map(|b| b.to_string()).collect()
}

impl Config {
    pub fn new<P: AsRef<Path>>(product: P) -> Self {
        Self {
            product: product.as_ref().to_path_buf(),
            bands: default_bands(),
            resolution: None,
            close_policy: ClosePolicy::default(),
            cloud_mask: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn product(&self) -> &Path {
        &self.product
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    pub fn close_policy(&self) -> ClosePolicy {
        self.close_policy
    }

    pub fn cloud_mask(&self) -> Option<&CloudMaskConfig> {
        self.cloud_mask.as_ref()
    }
}
