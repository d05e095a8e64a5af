/// Upper bound of the valid reflectance range of Level-2A products (quantification value
/// scaled to `[0, 1]` at 2000).
pub const MAX_REFLECTANCE: f32 = 2000.0;

/// Discards out-of-range reflectance values and maps the remaining range onto `[0, 1]`.
pub fn normalize_reflectance(values: &[f32]) -> Vec<f32> {
    values.iter().map(|&v| normalize_value(v)).collect()
}

pub fn normalize_reflectance_in_place(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = normalize_value(*v);
    }
}

fn normalize_value(v: f32) -> f32 {
    v.clamp(0.0, MAX_REFLECTANCE) / MAX_REFLECTANCE
}
