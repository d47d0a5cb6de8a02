//! OpenWeatherMap Provider - Current weather by city name

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::application::services::format::title_case;
use crate::domain::entities::{CurrentWeather, Reading, WeatherQuery, WeatherResult};
use crate::domain::traits::WeatherProvider;

/// OpenWeatherMap current weather endpoint
pub const API_BASE: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Unit system sent with every request (Celsius, m/s)
const UNITS: &str = "metric";

/// OpenWeatherMap provider
pub struct OpenWeatherClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

/// Response body for a successful lookup
#[derive(Deserialize, Debug)]
struct CurrentResponse {
    name: String,
    sys: Sys,
    main: Main,
    weather: Vec<Condition>,
    wind: Option<Wind>,
}

#[derive(Deserialize, Debug)]
struct Sys {
    country: String,
}

#[derive(Deserialize, Debug)]
struct Main {
    temp: Reading,
    feels_like: Reading,
    humidity: u32,
    pressure: u32,
}

#[derive(Deserialize, Debug)]
struct Condition {
    id: i32,
    description: String,
}

#[derive(Deserialize, Debug)]
struct Wind {
    speed: Option<Reading>,
}

impl CurrentResponse {
    fn into_weather(self) -> Result<CurrentWeather, String> {
        let condition = self.weather
            .into_iter()
            .next()
            .ok_or_else(|| "No weather conditions in response".to_string())?;

        Ok(CurrentWeather {
            city: self.name,
            country: self.sys.country,
            temp_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.and_then(|w| w.speed),
            condition_code: condition.id,
            description: title_case(&condition.description),
        })
    }
}

/// Decodes a 200 response body, failing closed on any schema mismatch
fn parse_current(body: &str) -> Result<CurrentWeather, String> {
    let response: CurrentResponse = serde_json::from_str(body)
        .map_err(|e| format!("Invalid weather payload: {}", e))?;
    response.into_weather()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &str {
        "openweather"
    }

    async fn fetch(&self, query: &WeatherQuery) -> WeatherResult {
        let response = match self.client
            .get(&self.base_url)
            .query(&[
                ("q", query.city()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            // The request URL carries the API key
            Err(e) => return WeatherResult::transport(format!("Request failed: {}", e.without_url())),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return WeatherResult::NotFound;
        }
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return WeatherResult::transport(format!(
                "API request failed with status {}: {}",
                status,
                truncate_body(&body)
            ));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return WeatherResult::transport(format!("Failed to read response body: {}", e.without_url()))
            }
        };

        match parse_current(&body) {
            Ok(weather) => WeatherResult::Found(weather),
            Err(e) => {
                tracing::debug!("Rejected weather payload: {}", truncate_body(&body));
                WeatherResult::transport(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let body = r#"{
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 15.0, "feels_like": 14.0, "humidity": 80, "pressure": 1012},
            "weather": [{"id": 801, "main": "Clouds", "description": "few clouds"}],
            "wind": {"speed": 4.1, "deg": 80}
        }"#;

        let weather = parse_current(body).unwrap();
        assert_eq!(weather.city, "London");
        assert_eq!(weather.country, "GB");
        assert_eq!(weather.humidity_pct, 80);
        assert_eq!(weather.pressure_hpa, 1012);
        assert_eq!(weather.condition_code, 801);
        assert_eq!(weather.description, "Few Clouds");
        assert_eq!(weather.wind_speed_mps, Some(Reading::Float(4.1)));
    }

    #[test]
    fn test_integer_values_stay_integers() {
        let body = r#"{
            "name": "Cairo",
            "sys": {"country": "EG"},
            "main": {"temp": 30, "feels_like": 31.5, "humidity": 20, "pressure": 1009},
            "weather": [{"id": 800, "description": "clear sky"}],
            "wind": {"speed": 5}
        }"#;

        let weather = parse_current(body).unwrap();
        assert_eq!(weather.temp_c, Reading::Int(30));
        assert_eq!(weather.feels_like_c, Reading::Float(31.5));
        assert_eq!(weather.wind_speed_mps, Some(Reading::Int(5)));
    }

    #[test]
    fn test_wind_is_read_from_top_level_only() {
        let body = r#"{
            "name": "Oslo",
            "sys": {"country": "NO"},
            "main": {"temp": -2.5, "feels_like": -6.0, "humidity": 90, "pressure": 1001,
                     "wind": {"speed": 9.9}},
            "weather": [{"id": 600, "description": "light snow"}]
        }"#;

        let weather = parse_current(body).unwrap();
        assert_eq!(weather.wind_speed_mps, None);
        assert_eq!(weather.description, "Light Snow");
    }

    #[test]
    fn test_missing_required_field_fails_closed() {
        let body = r#"{"name": "Nowhere", "main": {"temp": 1.0}, "weather": []}"#;
        let err = parse_current(body).unwrap_err();
        assert!(err.starts_with("Invalid weather payload"));
    }

    #[test]
    fn test_empty_conditions_fail_closed() {
        let body = r#"{
            "name": "Lima",
            "sys": {"country": "PE"},
            "main": {"temp": 19.0, "feels_like": 19.0, "humidity": 77, "pressure": 1013},
            "weather": []
        }"#;
        assert_eq!(parse_current(body).unwrap_err(), "No weather conditions in response");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(250);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }
}
