//! Form validation for new regions.

use crate::{error::ValidationError, model::NewRegion, Region};

/// Parse coordinate text typed by a user. Both `,` and `.` are accepted as
/// decimal separator.
pub fn parse_coordinate(text: &str) -> Option<f64> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn latitude_in_range(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

pub fn longitude_in_range(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}

/// Validate the add-region form.
///
/// Checks run in the order the form reports them: parse, range, then name.
/// Duplicate detection needs the current list and lives in [`name_taken`].
pub fn validate_region(
    name: &str,
    latitude: &str,
    longitude: &str,
) -> Result<NewRegion, ValidationError> {
    let (Some(lat), Some(lon)) = (parse_coordinate(latitude), parse_coordinate(longitude)) else {
        return Err(ValidationError::InvalidCoordinates);
    };

    if !latitude_in_range(lat) || !longitude_in_range(lon) {
        return Err(ValidationError::CoordinatesOutOfRange);
    }

    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(NewRegion {
        name: name.to_string(),
        latitude: lat,
        longitude: lon,
    })
}

/// Case-insensitive name lookup.
pub fn name_taken(regions: &[Region], name: &str) -> bool {
    let wanted = name.trim().to_lowercase();
    regions.iter().any(|r| r.name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_and_dot_parse_the_same() {
        for (comma, dot) in [("46,81", "46.81"), ("-71,2080", "-71.2080"), (" 0,5 ", "0.5")] {
            assert_eq!(parse_coordinate(comma), parse_coordinate(dot));
            assert!(parse_coordinate(comma).is_some());
        }
    }

    #[test]
    fn garbage_is_rejected() {
        for text in ["", "   ", "abc", "12,3,4", "1.2.3", "NaN", "inf", "-infinity"] {
            assert_eq!(parse_coordinate(text), None, "{text:?}");
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_region("Pole", "90", "180").is_ok());
        assert!(validate_region("Pole", "-90", "-180").is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let cases = [("90.0001", "0"), ("-91", "0"), ("0", "180,5"), ("0", "-181")];
        for (lat, lon) in cases {
            assert_eq!(
                validate_region("X", lat, lon),
                Err(ValidationError::CoordinatesOutOfRange),
                "{lat} {lon}"
            );
        }
    }

    #[test]
    fn unparseable_wins_over_empty_name() {
        assert_eq!(validate_region("", "north", "1"), Err(ValidationError::InvalidCoordinates));
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(validate_region("   ", "1", "1"), Err(ValidationError::EmptyName));

        let region = validate_region("  Gaspé ", "48,83", "-64.48").unwrap();
        assert_eq!(region.name, "Gaspé");
        assert_eq!(region.latitude, 48.83);
        assert_eq!(region.longitude, -64.48);
    }

    #[test]
    fn name_taken_ignores_case_and_whitespace() {
        let regions = vec![Region { id: 1, name: "Montréal".into(), latitude: 45.5, longitude: -73.6 }];

        assert!(name_taken(&regions, "montréal"));
        assert!(name_taken(&regions, " MONTRÉAL "));
        assert!(!name_taken(&regions, "Laval"));
    }
}
