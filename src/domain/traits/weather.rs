use async_trait::async_trait;
use crate::domain::entities::{WeatherQuery, WeatherResult};

/// Weather provider - one stateless lookup per call.
///
/// Implementations never fail past this boundary: every failure is
/// folded into [`WeatherResult::TransportError`] or [`WeatherResult::NotFound`].
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Current conditions for the queried city
    async fn fetch(&self, query: &WeatherQuery) -> WeatherResult;
}
