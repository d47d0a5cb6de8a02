//! Weather lookup entities

use serde::Deserialize;

use crate::application::errors::QueryError;

/// A validated city lookup. The city is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    pub fn new(city: impl AsRef<str>) -> Result<Self, QueryError> {
        let city = city.as_ref().trim();
        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }
        Ok(Self { city: city.to_string() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// A measurement as the provider sent it. Integer values stay integers
/// so they render without a decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Int(i64),
    Float(f64),
}

/// Current conditions for a resolved city
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temp_c: Reading,
    pub feels_like_c: Reading,
    pub humidity_pct: u32,
    pub pressure_hpa: u32,
    pub wind_speed_mps: Option<Reading>,
    pub condition_code: i32,
    /// Already title-cased
    pub description: String,
}

/// Outcome of one weather lookup
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Found(CurrentWeather),
    NotFound,
    TransportError { message: String },
}

impl WeatherResult {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError { message: message.into() }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            WeatherResult::Found(_) => "found",
            WeatherResult::NotFound => "not_found",
            WeatherResult::TransportError { .. } => "transport_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_city() {
        let query = WeatherQuery::new("  New York \n").unwrap();
        assert_eq!(query.city(), "New York");
    }

    #[test]
    fn test_query_rejects_blank_city() {
        assert!(matches!(WeatherQuery::new(""), Err(QueryError::EmptyCity)));
        assert!(matches!(WeatherQuery::new(" \t "), Err(QueryError::EmptyCity)));
    }

    #[test]
    fn test_reading_keeps_integer_payloads() {
        let whole: Reading = serde_json::from_str("5").unwrap();
        assert_eq!(whole, Reading::Int(5));

        let float: Reading = serde_json::from_str("15.0").unwrap();
        assert_eq!(float, Reading::Float(15.0));

        let negative: Reading = serde_json::from_str("-2.5").unwrap();
        assert_eq!(negative, Reading::Float(-2.5));
    }

    #[test]
    fn test_result_outcome_labels() {
        assert_eq!(WeatherResult::NotFound.outcome(), "not_found");
        assert_eq!(WeatherResult::transport("boom").outcome(), "transport_error");
    }
}
