//! Degrees/minutes/seconds to signed decimal degrees

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::rational::to_float;
use crate::models::types::TagValue;

/// Hemisphere reference of a GPS coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefChar {
    North,
    South,
    East,
    West,
}

impl RefChar {
    /// South and West give negative decimal degrees
    pub fn is_negative(&self) -> bool {
        matches!(self, RefChar::South | RefChar::West)
    }

    pub fn as_char(&self) -> char {
        match self {
            RefChar::North => 'N',
            RefChar::South => 'S',
            RefChar::East => 'E',
            RefChar::West => 'W',
        }
    }

    /// Parse a reference tag value (text such as `"N"`, possibly NUL-padded)
    pub fn from_tag_value(value: &TagValue) -> Option<Self> {
        match value {
            TagValue::Text(s) => s.parse().ok(),
            TagValue::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for RefChar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches(|c: char| c == '\0' || c.is_whitespace()) {
            "N" | "n" => Ok(RefChar::North),
            "S" | "s" => Ok(RefChar::South),
            "E" | "e" => Ok(RefChar::East),
            "W" | "w" => Ok(RefChar::West),
            other => Err(format!("invalid GPS reference: {:?}", other)),
        }
    }
}

impl fmt::Display for RefChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

const COMPONENT_NAMES: [&str; 3] = ["degrees", "minutes", "seconds"];

/// Why a DMS value could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmsError {
    /// Not a list of exactly three elements
    BadShape,
    /// Named component is not numeric
    Component(&'static str),
}

impl fmt::Display for DmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmsError::BadShape => f.write_str("expected degrees, minutes, seconds triple"),
            DmsError::Component(name) => write!(f, "{} component is not numeric", name),
        }
    }
}

/// Convert a DMS triple plus hemisphere to decimal degrees
pub fn to_decimal(dms: &TagValue, reference: RefChar) -> Option<f64> {
    try_to_decimal(dms, reference).ok()
}

/// Like [`to_decimal`], reporting what was wrong
pub fn try_to_decimal(dms: &TagValue, reference: RefChar) -> Result<f64, DmsError> {
    let components = match dms.as_list() {
        Some(items) if items.len() == 3 => items,
        _ => {
            debug!(value = %dms, "DMS value is not a triple");
            return Err(DmsError::BadShape);
        }
    };

    let mut parts = [0.0f64; 3];
    for (i, component) in components.iter().enumerate() {
        parts[i] = to_float(component).ok_or_else(|| {
            debug!(component = COMPONENT_NAMES[i], value = %component, "Unconvertible DMS component");
            DmsError::Component(COMPONENT_NAMES[i])
        })?;
    }

    let [degrees, minutes, seconds] = parts;
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;

    Ok(if reference.is_negative() { -decimal } else { decimal })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(d: (i64, i64), m: (i64, i64), s: (i64, i64)) -> TagValue {
        TagValue::List(vec![
            TagValue::Rational(d.0, d.1),
            TagValue::Rational(m.0, m.1),
            TagValue::Rational(s.0, s.1),
        ])
    }

    #[test]
    fn test_north_latitude() {
        let dms = triple((40, 1), (26, 1), (46, 1));
        let value = to_decimal(&dms, RefChar::North).unwrap();
        assert!((value - 40.446111).abs() < 1e-6);
    }

    #[test]
    fn test_west_longitude_negated() {
        let dms = triple((79, 1), (58, 1), (56, 1));
        let value = to_decimal(&dms, RefChar::West).unwrap();
        assert!((value + 79.982222).abs() < 1e-6);
    }

    #[test]
    fn test_formula_and_sign_symmetry() {
        let samples = [
            ((0, 1), (0, 1), (0, 1)),
            ((12, 1), (30, 1), (1530, 100)),
            ((179, 1), (59, 1), (5999, 100)),
            ((51, 1), (28, 2), (3, 4)),
        ];
        for (d, m, s) in samples {
            let dms = triple(d, m, s);
            let expected =
                d.0 as f64 / d.1 as f64 + m.0 as f64 / m.1 as f64 / 60.0 + s.0 as f64 / s.1 as f64 / 3600.0;

            let north = to_decimal(&dms, RefChar::North).unwrap();
            let east = to_decimal(&dms, RefChar::East).unwrap();
            let south = to_decimal(&dms, RefChar::South).unwrap();
            let west = to_decimal(&dms, RefChar::West).unwrap();

            assert!((north - expected).abs() < 1e-9);
            assert_eq!(north, east);
            assert_eq!(south, -north);
            assert_eq!(west, -east);
        }
    }

    #[test]
    fn test_mixed_encodings() {
        let dms = TagValue::List(vec![
            TagValue::Integer(10),
            TagValue::List(vec![TagValue::Integer(30), TagValue::Integer(1)]),
            TagValue::Float(36.0),
        ]);
        let value = to_decimal(&dms, RefChar::North).unwrap();
        assert!((value - 10.51).abs() < 1e-9);
    }

    #[test]
    fn test_zero_denominator_component() {
        let dms = triple((10, 1), (5, 0), (0, 0));
        assert_eq!(to_decimal(&dms, RefChar::North), Some(10.0));
    }

    #[test]
    fn test_unconvertible_degrees() {
        let dms = TagValue::List(vec![
            TagValue::Empty,
            TagValue::Rational(1, 2),
            TagValue::Rational(3, 1),
        ]);
        assert_eq!(to_decimal(&dms, RefChar::North), None);
        assert_eq!(
            try_to_decimal(&dms, RefChar::North),
            Err(DmsError::Component("degrees"))
        );
    }

    #[test]
    fn test_wrong_shape() {
        let two = TagValue::List(vec![TagValue::Integer(1), TagValue::Integer(2)]);
        let four = TagValue::List(vec![TagValue::Integer(1); 4]);
        assert_eq!(try_to_decimal(&two, RefChar::East), Err(DmsError::BadShape));
        assert_eq!(try_to_decimal(&four, RefChar::East), Err(DmsError::BadShape));
        assert_eq!(to_decimal(&TagValue::Rational(1, 1), RefChar::East), None);
    }

    #[test]
    fn test_ref_parsing() {
        assert_eq!("S".parse::<RefChar>(), Ok(RefChar::South));
        assert_eq!("W\0".parse::<RefChar>(), Ok(RefChar::West));
        assert!("X".parse::<RefChar>().is_err());
        assert_eq!(
            RefChar::from_tag_value(&TagValue::Text("E".to_string())),
            Some(RefChar::East)
        );
        assert_eq!(RefChar::from_tag_value(&TagValue::Integer(1)), None);
    }
}
