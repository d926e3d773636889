//! Point Feature Extraction
//!
//! Derives the 4-feature vector for one clicked index of a flux series.
//! Pure and deterministic - the same function feeds both prediction and
//! training, so the classifier never sees two different views of one click.

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;

/// Half-width of the local window used for the std-dev feature
const WINDOW_HALF: usize = 3;

/// Error for an extraction request outside the series bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "index {} out of range for series of length {}", self.index, self.len)
    }
}

impl std::error::Error for ExtractError {}

/// Extract the feature vector for `flux[index]`.
///
/// Layout (see `layout.rs`):
/// - `flux_value`: the clicked sample itself
/// - `delta_prev`: `flux[index] - flux[index-1]`; the clicked sample stands
///   in for the missing backward neighbor at the left edge, so the delta
///   collapses to zero there
/// - `delta_next`: `flux[index+1] - flux[index]`, same substitution at the
///   right edge
/// - `local_std`: population std dev over `flux[index-3 ..= index+3]`,
///   truncated at the series ends (at most 7 samples)
pub fn extract(flux: &[f32], index: usize) -> Result<FeatureVector, ExtractError> {
    if index >= flux.len() {
        return Err(ExtractError { index, len: flux.len() });
    }

    let val = flux[index];
    let prev = if index > 0 { flux[index - 1] } else { val };
    let next = if index + 1 < flux.len() { flux[index + 1] } else { val };

    let start = index.saturating_sub(WINDOW_HALF);
    let end = (index + WINDOW_HALF + 1).min(flux.len());
    let local_std = std_dev(&flux[start..end]);

    let mut values = [0.0f32; FEATURE_COUNT];
    values[0] = val;
    values[1] = val - prev;
    values[2] = next - val;
    values[3] = local_std;

    Ok(FeatureVector::from_values(values))
}

/// Population standard deviation
fn std_dev(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let n = window.len() as f32;
    let mean = window.iter().sum::<f32>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_interior_point() {
        let flux = [1.0, 2.0, 4.0, 7.0, 11.0, 16.0, 22.0, 29.0];
        let v = extract(&flux, 3).unwrap();

        assert_eq!(v.values[0], 7.0);
        assert_eq!(v.values[1], 3.0); // 7 - 4
        assert_eq!(v.values[2], 4.0); // 11 - 7

        // Window covers indices 0..7 (7 samples)
        let window = &flux[0..7];
        let mean = window.iter().sum::<f32>() / 7.0;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 7.0;
        assert!((v.values[3] - var.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_extract_left_edge_clamps_backward_delta() {
        let flux = [5.0, 8.0, 9.0];
        let v = extract(&flux, 0).unwrap();

        assert_eq!(v.values[0], 5.0);
        assert_eq!(v.values[1], 0.0); // no backward neighbor
        assert_eq!(v.values[2], 3.0); // 8 - 5
    }

    #[test]
    fn test_extract_right_edge_clamps_forward_delta() {
        let flux = [5.0, 8.0, 9.0];
        let v = extract(&flux, 2).unwrap();

        assert_eq!(v.values[0], 9.0);
        assert_eq!(v.values[1], 1.0); // 9 - 8
        assert_eq!(v.values[2], 0.0); // no forward neighbor
    }

    #[test]
    fn test_extract_single_sample() {
        let flux = [3.5];
        let v = extract(&flux, 0).unwrap();
        assert_eq!(v.values, [3.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_extract_window_truncated_near_ends() {
        // Index 1 of a length-4 series: window is 0..4, not 7 samples
        let flux = [2.0, 2.0, 2.0, 2.0];
        let v = extract(&flux, 1).unwrap();
        assert_eq!(v.values[3], 0.0); // constant series, zero variance
    }

    #[test]
    fn test_extract_out_of_range() {
        let flux = [1.0, 2.0];
        let err = extract(&flux, 2).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.len, 2);

        assert!(extract(&[], 0).is_err());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let flux = [0.98, 1.01, 0.97, 0.60, 0.95, 1.02, 0.99];
        let a = extract(&flux, 3).unwrap();
        let b = extract(&flux, 3).unwrap();
        assert_eq!(a, b);
    }
}
