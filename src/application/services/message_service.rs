use chrono::Utc;

use crate::application::errors::BotError;
use crate::application::messaging::router::{Action, IntentRouter};
use crate::application::services::{format, replies};
use crate::domain::entities::{Message, Reply, WeatherQuery, WeatherResult};
use crate::domain::traits::{Bot, WeatherProvider};

/// Service for processing messages: route, look up, format, reply
pub struct MessageService<B: Bot, P: WeatherProvider> {
    bot: B,
    provider: P,
    router: IntentRouter,
}

impl<B: Bot, P: WeatherProvider> MessageService<B, P> {
    pub fn new(bot: B, provider: P, router: IntentRouter) -> Self {
        Self { bot, provider, router }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Process an incoming message and produce exactly one reply
    pub async fn process(&self, message: &Message) -> Reply {
        let intent = self.router.intent(message);
        let sender = message.sender.as_ref().map(|u| u.to_string()).unwrap_or_else(|| "anonymous".to_string());
        tracing::debug!(
            "[{}] message {} from {}: intent={} type={}",
            message.chat_id,
            message.id,
            sender,
            intent.as_str(),
            message.message_type.as_str()
        );

        match self.router.route(message) {
            Action::Reply(reply) => reply,
            Action::LookupWeather(query) => {
                if let Err(e) = self.bot.send_typing(&message.chat_id).await {
                    tracing::warn!("[{}] Failed to send typing indicator: {}", message.chat_id, e);
                }
                self.lookup(&query).await
            }
        }
    }

    /// Fetch and render the weather for one query
    pub async fn lookup(&self, query: &WeatherQuery) -> Reply {
        let result = self.provider.fetch(query).await;
        tracing::info!(
            "Weather lookup via {}: city='{}' outcome={}",
            self.provider.name(),
            query.city(),
            result.outcome()
        );

        match result {
            WeatherResult::Found(weather) => {
                Reply::new(format::format_weather(&weather)).unwrap_or_else(replies::lookup_failed)
            }
            WeatherResult::NotFound => replies::not_found(query.city()),
            WeatherResult::TransportError { message } => {
                tracing::error!("Error getting weather for {}: {}", query.city(), message);
                replies::lookup_failed()
            }
        }
    }

    /// Process a message and deliver the reply through the bot
    pub async fn handle(&self, message: Message) -> Result<String, BotError> {
        let reply = self.process(&message).await;
        let elapsed_ms = (Utc::now() - message.timestamp).num_milliseconds();

        let preview: String = reply.text().chars().take(100).collect();
        tracing::info!(
            "Sending {} response to chat_id {} ({} ms): {}",
            message.platform,
            message.chat_id,
            elapsed_ms,
            preview
        );

        self.respond(&message.chat_id, &reply).await
    }

    /// Send a response message
    pub async fn respond(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        self.bot.send_message(chat_id, reply.text()).await
    }
}
