//! Location input validation
//!
//! City and country names are accepted only when they consist of letters
//! and spaces, the shape the upstream provider expects for place-name
//! queries. Validation runs before the rate limiter so malformed requests
//! never cost quota.

use regex::Regex;
use thiserror::Error;

/// Why a location was rejected.
///
/// The `Display` strings double as the error messages returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("City and country must be provided.")]
    MissingInput,

    #[error("City must contain only letters and spaces.")]
    InvalidCity,

    #[error("Country must contain only letters and spaces.")]
    InvalidCountry,
}

/// Validates city and country names before they reach the upstream API.
pub struct LocationValidator {
    pattern: Regex,
}

impl LocationValidator {
    pub fn new() -> Self {
        LocationValidator {
            pattern: Regex::new("^[a-zA-Z ]+$").expect("location pattern"),
        }
    }

    /// Check both names, city first.
    ///
    /// Blank or whitespace-only input is rejected before the pattern is
    /// consulted, so a missing query parameter and an empty one produce the
    /// same error.
    pub fn validate(&self, city: &str, country: &str) -> Result<(), ValidationError> {
        if city.trim().is_empty() || country.trim().is_empty() {
            let err = ValidationError::MissingInput;
            tracing::warn!(%err, "location validation failed");
            return Err(err);
        }

        if !self.pattern.is_match(city) {
            let err = ValidationError::InvalidCity;
            tracing::warn!(city, %err, "location validation failed");
            return Err(err);
        }

        if !self.pattern.is_match(country) {
            let err = ValidationError::InvalidCountry;
            tracing::warn!(country, %err, "location validation failed");
            return Err(err);
        }

        tracing::debug!(city, country, "location validated");
        Ok(())
    }
}

impl Default for LocationValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_locations() {
        let validator = LocationValidator::new();
        for (city, country) in [
            ("New York", "USA"),
            ("Los Angeles", "United States"),
            ("Tokyo", "Japan"),
            ("Paris", "France"),
        ] {
            assert_eq!(validator.validate(city, country), Ok(()), "{city}, {country}");
        }
    }

    #[test]
    fn test_rejects_blank_input() {
        let validator = LocationValidator::new();
        for (city, country) in [("", "France"), ("Paris", ""), ("   ", "USA"), ("", "")] {
            assert_eq!(
                validator.validate(city, country),
                Err(ValidationError::MissingInput),
                "{city:?}, {country:?}"
            );
        }
    }

    #[test]
    fn test_rejects_invalid_characters() {
        let validator = LocationValidator::new();

        assert_eq!(
            validator.validate("New York1", "USA"),
            Err(ValidationError::InvalidCity)
        );
        assert_eq!(
            validator.validate("Tokyo@", "Japan"),
            Err(ValidationError::InvalidCity)
        );
        assert_eq!(
            validator.validate("Los Angeles", "United States1"),
            Err(ValidationError::InvalidCountry)
        );
        assert_eq!(
            validator.validate("Paris", "Fran$ce"),
            Err(ValidationError::InvalidCountry)
        );
    }

    #[test]
    fn test_city_is_checked_before_country() {
        let validator = LocationValidator::new();
        assert_eq!(
            validator.validate("Tokyo@", "Fran$ce"),
            Err(ValidationError::InvalidCity)
        );
    }

    #[test]
    fn test_error_messages_match_api_contract() {
        assert_eq!(
            ValidationError::MissingInput.to_string(),
            "City and country must be provided."
        );
        assert_eq!(
            ValidationError::InvalidCity.to_string(),
            "City must contain only letters and spaces."
        );
        assert_eq!(
            ValidationError::InvalidCountry.to_string(),
            "Country must contain only letters and spaces."
        );
    }
}
