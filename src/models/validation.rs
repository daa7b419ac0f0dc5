//! Field validation shared by the record input types.

use crate::error::{GeoError, Result};

/// Returns the trimmed value of a required text field.
pub fn required(field: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(GeoError::validation(format!("'{}' is required", field))),
    }
}

/// Trims an optional text field, treating blank as absent.
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// True when every character is a letter.
pub fn is_alphabetic(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

/// Rejects negative populations and converts to the stored type.
pub fn population(value: Option<i64>) -> Result<Option<u64>> {
    match value {
        Some(p) if p < 0 => Err(GeoError::validation("population must be non-negative")),
        Some(p) => Ok(Some(p as u64)),
        None => Ok(None),
    }
}

/// Checks latitude/longitude ranges when present.
pub fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::validation("latitude must be within [-90, 90]"));
        }
    }
    if let Some(lon) = longitude {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::validation("longitude must be within [-180, 180]"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", Some("  Ohio ")).unwrap(), "Ohio");
    }

    #[test]
    fn test_required_rejects_blank_and_missing() {
        assert!(matches!(required("name", Some("   ")), Err(GeoError::Validation(_))));
        assert!(matches!(required("name", None), Err(GeoError::Validation(_))));
    }

    #[test]
    fn test_is_alphabetic() {
        assert!(is_alphabetic("NY"));
        assert!(!is_alphabetic("N1"));
        assert!(!is_alphabetic("CA-ON"));
        assert!(!is_alphabetic(""));
    }

    #[test]
    fn test_population() {
        assert_eq!(population(Some(10)).unwrap(), Some(10));
        assert_eq!(population(None).unwrap(), None);
        assert!(population(Some(-1)).is_err());
    }

    #[test]
    fn test_coordinates() {
        assert!(coordinates(Some(40.7), Some(-74.0)).is_ok());
        assert!(coordinates(Some(91.0), None).is_err());
        assert!(coordinates(None, Some(-181.0)).is_err());
    }
}
