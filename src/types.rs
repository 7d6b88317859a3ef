use serde::{Deserialize, Serialize};

/// Body of a webhook delivery from the LINE platform.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event in a webhook delivery batch.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "webhookEventId")]
    pub webhook_event_id: Option<String>,
    #[serde(rename = "deliveryContext")]
    pub delivery_context: Option<DeliveryContext>,
    pub message: Option<Message>,
    #[serde(rename = "replyToken")]
    pub reply_token: Option<String>,
    pub source: Option<Source>,
    pub timestamp: Option<i64>,
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryContext {
    #[serde(rename = "isRedelivery")]
    pub is_redelivery: bool,
}

/// Message content. One struct covers every content kind; fields a
/// kind doesn't carry stay `None`.
#[derive(Debug, Default, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileSize")]
    pub file_size: Option<u64>,
    pub title: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "packageId")]
    pub package_id: Option<String>,
    #[serde(rename = "stickerId")]
    pub sticker_id: Option<String>,
    #[serde(rename = "quoteToken")]
    pub quote_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "groupId")]
    pub group_id: Option<String>,
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplyMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyRequest {
    #[serde(rename = "replyToken")]
    pub reply_token: String,
    pub messages: Vec<ReplyMessage>,
}

/// Response body of the reply API. Older API versions return an empty
/// object, so `sentMessages` defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyReceipt {
    #[serde(rename = "sentMessages", default)]
    pub sent_messages: Vec<SentMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    #[serde(rename = "quoteToken")]
    pub quote_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub channel_secret_configured: bool,
    pub channel_access_token_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}
