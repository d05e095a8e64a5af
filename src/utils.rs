use gdal::Dataset;

use crate::product::RasterPath;
use crate::reflectance::normalize_reflectance_in_place;

/// Element `n` of `xs`, or `None` when out of bounds.
pub fn nth<T>(xs: &[T], n: usize) -> Option<&T> {
    xs.get(n)
}

/// Element `n` of `xs`, or `default` when out of bounds.
pub fn nth_or<T: Clone>(xs: &[T], n: usize, default: T) -> T {
    xs.get(n).cloned().unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandStatistics {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub valid: usize,
    pub total: usize,
}

impl BandStatistics {
    pub fn from_values(values: &[f32]) -> Self {
        let valid_values: Vec<f32> = values.iter().filter(|v| !v.is_nan()).cloned().collect();

        let mean = if valid_values.is_empty() {
            f32::NAN
        } else {
            valid_values.iter().sum::<f32>() / valid_values.len() as f32
        };

        BandStatistics {
            min: valid_values.iter().fold(f32::INFINITY, |a, &b| a.min(b)),
            max: valid_values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)),
            mean,
            valid: valid_values.len(),
            total: values.len(),
        }
    }
}

/// Reads band 1 of every dataset, normalizes its reflectance and prints summary statistics.
pub fn print_reflectance_statistics(
    paths: &[RasterPath],
    datasets: &[Dataset],
) -> Result<(), Box<dyn std::error::Error>> {
    for (idx, dataset) in datasets.iter().enumerate() {
        let name = nth(paths, idx).map(|p| p.file_name()).unwrap_or("?");
        let band = dataset.rasterband(1)?;
        let (width, height) = dataset.raster_size();
        let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;

        let mut values: Vec<f32> = buffer.data().to_vec();
        normalize_reflectance_in_place(&mut values);
        let stats = BandStatistics::from_values(&values);

        println!("{} ({}x{})", name, width, height);
        println!("  Min: {:.4}", stats.min);
        println!("  Max: {:.4}", stats.max);
        println!("  Mean: {:.4}", stats.mean);
        println!(
            "  Valid pixels: {} / {} ({:.1}%)",
            stats.valid,
            stats.total,
            100.0 * stats.valid as f32 / stats.total.max(1) as f32
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth() {
        let empty: [i32; 0] = [];
        assert_eq!(nth(&empty, 0), None);
        assert_eq!(nth(&[1, 2, 3], 5), None);
        assert_eq!(nth(&[1, 2, 3], 1), Some(&2));
    }

    #[test]
    fn test_nth_or() {
        let empty: [&str; 0] = [];
        assert_eq!(nth_or(&empty, 0, "default"), "default");
        assert_eq!(nth_or(&["a", "b"], 1, "default"), "b");
    }

    #[test]
    fn test_band_statistics_skip_nan() {
        let stats = BandStatistics::from_values(&[0.0, f32::NAN, 0.5, 1.0]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.mean, 0.5);
        assert_eq!(stats.valid, 3);
        assert_eq!(stats.total, 4);
    }
}
