//! Rational / numeric normalization
//!
//! EXIF decoders surface numbers as plain integers or floats, as rational
//! values, or as two-element `[numerator, denominator]` lists. Everything is
//! folded into [`RawNumeric`] once, then converted to `f64`.

use crate::models::types::TagValue;

/// Uniform numeric representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawNumeric {
    Number(f64),
    /// numerator, denominator
    Ratio(i64, i64),
}

impl RawNumeric {
    /// Fold a raw tag value into a numeric, if it has a numeric shape
    pub fn from_tag_value(value: &TagValue) -> Option<Self> {
        match value {
            TagValue::Integer(v) => Some(RawNumeric::Number(*v as f64)),
            TagValue::Float(v) => Some(RawNumeric::Number(*v)),
            TagValue::Rational(num, den) => Some(RawNumeric::Ratio(*num, *den)),
            TagValue::List(items) => match items.as_slice() {
                [TagValue::Integer(num), TagValue::Integer(den)] => {
                    Some(RawNumeric::Ratio(*num, *den))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Value as `f64`. A zero denominator yields `0.0`.
    ///
    /// The zero-denominator rule keeps a common degenerate EXIF encoding
    /// from failing the whole extraction, at the cost of hiding corrupt
    /// rationals.
    pub fn to_f64(self) -> f64 {
        match self {
            RawNumeric::Number(v) => v,
            RawNumeric::Ratio(_, 0) => 0.0,
            RawNumeric::Ratio(num, den) => num as f64 / den as f64,
        }
    }
}

/// Convert a raw tag value to `f64`; `None` for non-numeric shapes
pub fn to_float(value: &TagValue) -> Option<f64> {
    RawNumeric::from_tag_value(value).map(RawNumeric::to_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_division() {
        assert_eq!(to_float(&TagValue::Rational(1, 2)), Some(0.5));
        assert_eq!(to_float(&TagValue::Rational(-7, 2)), Some(-3.5));
    }

    #[test]
    fn test_zero_denominator_is_zero() {
        assert_eq!(to_float(&TagValue::Rational(5, 0)), Some(0.0));
        assert_eq!(
            to_float(&TagValue::List(vec![TagValue::Integer(3), TagValue::Integer(0)])),
            Some(0.0)
        );
    }

    #[test]
    fn test_pair_list() {
        let pair = TagValue::List(vec![TagValue::Integer(46), TagValue::Integer(4)]);
        assert_eq!(to_float(&pair), Some(11.5));
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(to_float(&TagValue::Integer(40)), Some(40.0));
        assert_eq!(to_float(&TagValue::Float(12.25)), Some(12.25));
    }

    #[test]
    fn test_unconvertible_shapes() {
        assert_eq!(to_float(&TagValue::Empty), None);
        assert_eq!(to_float(&TagValue::Text("40".to_string())), None);
        assert_eq!(to_float(&TagValue::Bytes(vec![1, 2])), None);
        assert_eq!(
            to_float(&TagValue::List(vec![TagValue::Integer(1)])),
            None
        );
        assert_eq!(
            to_float(&TagValue::List(vec![
                TagValue::Integer(1),
                TagValue::Text("2".to_string())
            ])),
            None
        );
    }
}
