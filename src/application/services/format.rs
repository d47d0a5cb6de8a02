//! Response formatting for weather lookups

use std::fmt::Write;

use crate::domain::entities::{CurrentWeather, Reading};

pub const THUNDERSTORM: &str = "⛈️";
pub const DRIZZLE: &str = "🌦️";
pub const RAIN: &str = "🌧️";
pub const SNOW: &str = "❄️";
pub const ATMOSPHERE: &str = "🌫️";
pub const CLEAR: &str = "☀️";
pub const CLOUDS: &str = "☁️";

/// Shown in place of a wind speed the provider did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Icon for a provider condition code. Ranges are checked in order and
/// cover every integer.
pub fn condition_icon(code: i32) -> &'static str {
    if code < 300 {
        THUNDERSTORM
    } else if code < 400 {
        DRIZZLE
    } else if code < 600 {
        RAIN
    } else if code < 700 {
        SNOW
    } else if code < 800 {
        ATMOSPHERE
    } else if code == 800 {
        CLEAR
    } else {
        CLOUDS
    }
}

/// Renders current conditions as the multi-line reply text
pub fn format_weather(weather: &CurrentWeather) -> String {
    let wind = weather
        .wind_speed_mps
        .map(number)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        out,
        "{icon} Weather in {city}, {country}\n\n\
         🌡️ Temperature: {temp}°C\n\
         🤔 Feels like: {feels}°C\n\
         📝 Description: {description}\n\
         💧 Humidity: {humidity}%\n\
         📊 Pressure: {pressure} hPa\n\
         💨 Wind Speed: {wind} m/s",
        icon = condition_icon(weather.condition_code),
        city = weather.city,
        country = weather.country,
        temp = number(weather.temp_c),
        feels = number(weather.feels_like_c),
        description = weather.description,
        humidity = weather.humidity_pct,
        pressure = weather.pressure_hpa,
        wind = wind,
    );
    out
}

/// Capitalises the first letter of each word and lowercases the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Integers print plain (`5`), floats through `decimal`
fn number(value: Reading) -> String {
    match value {
        Reading::Int(n) => n.to_string(),
        Reading::Float(f) => decimal(f),
    }
}

/// Whole floats keep one decimal place (`15.0`), others print in shortest form (`14.25`)
fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
