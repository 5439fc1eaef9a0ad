// crates/emodict-core/src/encoding.rs

/// NRC emotion categories, in storage order.
pub const EMOTION_COLUMNS: [&str; 5] = ["anger", "disgust", "fear", "joy", "sadness"];

/// How raw per-row emotion values become the stored encoding vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Values are stored as-is; missing values become 0.0.
    Raw,
    /// Values are counts converted to per-row proportions; a row with a zero
    /// total stores an all-zero vector instead of dividing by zero.
    Proportional,
}

/// Produce the five-value encoding vector for one source row. Missing values
/// fill to 0.0 in both modes before any normalization is applied.
pub fn encode(values: &[Option<f64>; 5], mode: Normalization) -> [f64; 5] {
    let mut filled = [0.0f64; 5];
    for (slot, value) in filled.iter_mut().zip(values) {
        *slot = value.unwrap_or(0.0);
    }

    match mode {
        Normalization::Raw => filled,
        Normalization::Proportional => {
            let total: f64 = filled.iter().sum();
            if total == 0.0 {
                [0.0; 5]
            } else {
                filled.map(|value| value / total)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_fills_missing_with_zero() {
        let values = [Some(1.0), None, Some(0.5), None, Some(2.0)];
        assert_eq!(
            encode(&values, Normalization::Raw),
            [1.0, 0.0, 0.5, 0.0, 2.0]
        );
    }

    #[test]
    fn proportional_mode_divides_by_row_total() {
        let values = [Some(1.0), Some(0.0), Some(0.0), Some(2.0), Some(0.0)];
        let encoded = encode(&values, Normalization::Proportional);

        assert!((encoded[0] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(encoded[1], 0.0);
        assert_eq!(encoded[2], 0.0);
        assert!((encoded[3] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(encoded[4], 0.0);
        assert!((encoded.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn proportional_mode_keeps_zero_rows_zero() {
        let values = [Some(0.0); 5];
        assert_eq!(encode(&values, Normalization::Proportional), [0.0; 5]);
    }

    #[test]
    fn proportional_mode_treats_missing_as_zero_signal() {
        let values = [None; 5];
        assert_eq!(encode(&values, Normalization::Proportional), [0.0; 5]);
    }
}
