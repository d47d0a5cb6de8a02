//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{self, CommandRegistry};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl From<&User> for entities::User {
    fn from(user: &User) -> Self {
        let mut out = entities::User::new(user.id.to_string());
        if let Some(username) = &user.username {
            out = out.with_username(username);
        }
        if let Some(first_name) = &user.first_name {
            out = out.with_first_name(first_name);
        }
        out
    }
}

impl Update {
    /// Domain message for a text update; `None` for anything without text
    pub fn to_inbound(&self, parser: &MessageParser) -> Option<entities::Message> {
        let msg = self.message.as_ref()?;
        let text = msg.text.as_deref()?;
        let sender = msg.from.as_ref().map(entities::User::from);

        Some(parser
            .parse(msg.chat.id.to_string(), text, sender)
            .with_platform("telegram"))
    }
}

/// reqwest errors print the request URL, which embeds the bot token
fn network_error(e: reqwest::Error) -> BotError {
    BotError::Network(e.without_url().to_string())
}

fn parse_error(e: reqwest::Error) -> BotError {
    BotError::Parse(e.without_url().to_string())
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
    api_base: String,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "weather-bot".to_string(),
                username: "weather_bot".to_string(),
            },
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the adapter at another Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn token_preview(&self) -> &str {
        let end = self.token.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.token.len());
        &self.token[..end]
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotInfoResponse,
        }

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(parse_error)?;

        self.info = BotInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(parse_error)?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Send a plain text message via Telegram API
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest { chat_id, text };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(parse_error)?;

        Ok(data.result.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, registry: &CommandRegistry) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands: Vec<Command> = registry.all()
            .map(|c| Command {
                command: c.name.clone(),
                description: c.description.clone().unwrap_or_else(|| c.name.clone()),
            })
            .collect();
        let count = commands.len();

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Failed to register commands: {}", error)));
        }

        tracing::info!("Registered {} bot commands with Telegram", count);
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: &str, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: &'a str,
            action: &'a str,
        }

        let url = self.api_url("sendChatAction");
        let request = SendChatActionRequest { chat_id, action };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Chat action error: {}", response.status())));
        }

        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", self.token_preview());
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        match self.send_message_api(chat_id, text).await {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    async fn send_typing(&self, chat_id: &str) -> Result<(), BotError> {
        self.send_chat_action(chat_id, "typing").await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::entities::Content;

    fn adapter(server: &MockServer) -> TelegramAdapter {
        TelegramAdapter::new("123:ABC").with_api_base(server.uri())
    }

    #[test]
    fn test_update_to_inbound() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 5,
                "from": {"id": 77, "username": "kari", "first_name": "Kari"},
                "chat": {"id": -100},
                "text": "/weather@WeatherBot Bergen"
            }
        }))
        .unwrap();

        let msg = update.to_inbound(&MessageParser::new("/")).unwrap();
        assert_eq!(msg.chat_id, "-100");
        assert_eq!(msg.platform, "telegram");
        assert_eq!(msg.sender.unwrap().display_name(), "kari");
        assert_eq!(
            msg.content,
            Content::Command { name: "weather".to_string(), args: vec!["Bergen".to_string()] }
        );
    }

    #[test]
    fn test_update_without_text_is_skipped() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "message": {"message_id": 6, "chat": {"id": 1}}
        }))
        .unwrap();
        assert!(update.to_inbound(&MessageParser::new("/")).is_none());

        let update: Update = serde_json::from_value(json!({"update_id": 12})).unwrap();
        assert!(update.to_inbound(&MessageParser::new("/")).is_none());
    }

    #[test]
    fn test_next_offset() {
        let updates: Vec<Update> = serde_json::from_value(json!([
            {"update_id": 3}, {"update_id": 9}, {"update_id": 4}
        ]))
        .unwrap();
        assert_eq!(TelegramAdapter::get_next_offset(&updates, 0), 10);
        assert_eq!(TelegramAdapter::get_next_offset(&[], 10), 10);
    }

    #[test]
    fn test_token_preview_is_short() {
        let adapter = TelegramAdapter::new("1234567890:SECRET");
        assert_eq!(adapter.token_preview(), "12345678");
        assert_eq!(TelegramAdapter::new("abc").token_preview(), "abc");
    }

    #[tokio::test]
    async fn test_send_message_posts_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 991}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = adapter(&server).send_message("42", "hello").await.unwrap();
        assert_eq!(id, "991");
    }

    #[tokio::test]
    async fn test_typing_uses_chat_action() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendChatAction"))
            .and(body_json(json!({"chat_id": "42", "action": "typing"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server).send_typing("42").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_updates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {"update_id": 1, "message": {"message_id": 1, "chat": {"id": 5}, "text": "London"}}
                ]
            })))
            .mount(&server)
            .await;

        let updates = adapter(&server).get_updates(0, 0).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].message.as_ref().and_then(|m| m.text.as_deref()), Some("London"));
    }

    #[tokio::test]
    async fn test_register_commands_sends_registry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/setMyCommands"))
            .and(body_json(json!({"commands": [
                {"command": "start", "description": "Show the welcome message"},
                {"command": "help", "description": "Show help information"},
                {"command": "weather", "description": "Get weather for a specific city"}
            ]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server).register_commands(&CommandRegistry::with_defaults()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = adapter(&server).send_message("42", "hi").await.unwrap_err();
        assert!(matches!(err, BotError::Network(_)));
    }

    #[tokio::test]
    async fn test_connection_error_hides_token() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let token = "987654:SECRETTOKENVALUE";
        let adapter = TelegramAdapter::new(token).with_api_base(format!("http://127.0.0.1:{}", port));

        let err = adapter.send_message_api("42", "hi").await.unwrap_err();
        assert!(matches!(err, BotError::Network(_)));
        assert!(!err.to_string().contains("SECRETTOKENVALUE"), "token leaked: {}", err);

        let err = adapter.get_updates(0, 0).await.unwrap_err();
        assert!(!err.to_string().contains("SECRETTOKENVALUE"), "token leaked: {}", err);
    }
}
