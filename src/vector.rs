//! This is the vector math module
//! Provide dot product and cosine similarity

use crate::error::MetricError;

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions
pub fn dot_product(left: &[f32], right: &[f32]) -> Result<f32, MetricError> {
    check_dimensions(left, right)?;

    let dot_prod = left.iter()
        .zip(right.iter())
        .map(|(x, y)| x * y)
        .sum();

    Ok(dot_prod)
}

/// Euclidean magnitude
/// mag = sqrt(sum(v[i]^2))
pub fn magnitude(vector: &[f32]) -> f32 {
    vector.iter()
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt()
}

/// Cosine Similarity
/// cos = dot(a, b) / (|a| * |b|)
///
/// The result is not clamped to `[-1, 1]`, rounding overshoot is returned
/// as computed.
///
/// # Errors
///
/// * `DimensionMismatch` - the slices have different lengths
/// * `ZeroVectorMagnitude` - either slice has zero magnitude
///
/// # Examples
///
/// ```
/// use knnstore::vector::cosine;
///
/// assert_eq!(cosine(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap(), 1.0);
/// assert_eq!(cosine(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap(), 0.0);
/// assert!(cosine(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).is_err());
/// ```
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32, MetricError> {
    let dot = dot_product(a, b)?;

    let mag_a = magnitude(a);
    let mag_b = magnitude(b);

    if mag_a == 0.0 || mag_b == 0.0 {
        return Err(MetricError::ZeroVectorMagnitude);
    }

    Ok(dot / (mag_a * mag_b))
}

fn check_dimensions(left: &[f32], right: &[f32]) -> Result<(), MetricError> {
    if left.len() != right.len() {
        return Err(MetricError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
