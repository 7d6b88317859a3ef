//! Per-event classification and reply composition, plus the batch
//! fan-out. All delivery failures are contained here: one event's
//! outcome can never abort its siblings.

use crate::line::ReplyDelivery;
use crate::types::{Message, ReplyReceipt, WebhookEvent};
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info};

/// Result of processing one webhook event. `Skipped` and `Failed`
/// serialize as JSON null in the aggregate response.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReplyOutcome {
    Delivered(ReplyReceipt),
    Skipped,
    Failed,
}

/// Compose the reply text for a message. Total over any `type` string:
/// unknown kinds fall through to the catch-all arm, so classification
/// never fails, only delivery can.
pub fn compose_reply(message: &Message) -> String {
    match message.message_type.as_str() {
        "text" => message.text.clone().unwrap_or_default(),
        "image" => "画像を受け取りました！".to_string(),
        "video" => "動画を受け取りました！".to_string(),
        "audio" => "音声を受け取りました！".to_string(),
        "file" => format!(
            "ファイル「{}」を受け取りました！",
            message.file_name.as_deref().unwrap_or_default()
        ),
        "location" => format!(
            "「{}」の位置情報を受け取りました！",
            message.address.as_deref().unwrap_or_default()
        ),
        "sticker" => format!(
            "スタンプを受け取りました！(packageId: {}, stickerId: {})",
            message.package_id.as_deref().unwrap_or_default(),
            message.sticker_id.as_deref().unwrap_or_default()
        ),
        other => format!("「{}」タイプのメッセージを受け取りました！", other),
    }
}

/// Map one event to one outcome. Never returns an error: delivery
/// failures are logged and become `Failed` so concurrent siblings are
/// unaffected. Makes exactly zero or one delivery call.
pub async fn handle_event(client: &dyn ReplyDelivery, event: &WebhookEvent) -> ReplyOutcome {
    if event.event_type != "message" {
        info!("Skipping {} event", event.event_type);
        return ReplyOutcome::Skipped;
    }

    let Some(message) = &event.message else {
        error!("Message event without message body");
        return ReplyOutcome::Failed;
    };

    let Some(reply_token) = event.reply_token.as_deref().filter(|t| !t.is_empty()) else {
        error!("Message event without reply token");
        return ReplyOutcome::Failed;
    };

    let reply_text = compose_reply(message);

    match client.reply(reply_token, &reply_text).await {
        Ok(receipt) => ReplyOutcome::Delivered(receipt),
        Err(e) => {
            error!("Failed to send reply: {}", e);
            ReplyOutcome::Failed
        }
    }
}

/// Dispatch every event in the batch concurrently and wait for all of
/// them to settle. Outcomes come back positionally; no sibling can
/// short-circuit the join.
pub async fn process_events(
    client: &dyn ReplyDelivery,
    events: &[WebhookEvent],
) -> Vec<ReplyOutcome> {
    join_all(events.iter().map(|event| handle_event(client, event))).await
}
