pub mod bands;
pub mod batch;
pub mod cloud_mask;
pub mod config;
pub mod error;
pub mod osm;
pub mod product;
pub mod reflectance;
pub mod reproject;
pub mod utils;
pub mod window;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
