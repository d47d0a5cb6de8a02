//! Weather providers

pub mod openweather;

pub use openweather::OpenWeatherClient;
