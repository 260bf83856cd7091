use crate::domain::ports::Notifier;
use crate::domain::record::{PaymentRecord, PaymentStatus};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends approval requests and confirmations to the operator's Telegram
/// chat. Submission messages carry an inline keyboard whose callback data
/// (`approve_<txn_id>` / `reject_<txn_id>`) is parsed back by
/// `interfaces::callback` when the operator taps a button.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self> {
        Self::with_api_base(
            format!("https://api.telegram.org/bot{bot_token}"),
            chat_id,
        )
    }

    /// Point the notifier at a different API host, for tests.
    pub fn with_api_base(api_base: String, chat_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Notification(e.to_string()))?;
        Ok(Self {
            client,
            api_base,
            chat_id: chat_id.to_string(),
        })
    }

    async fn send_message(&self, text: String, reply_markup: Option<serde_json::Value>) -> Result<()> {
        let url = format!("{}/sendMessage", self.api_base);
        let mut payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(markup) = reply_markup {
            payload["reply_markup"] = markup;
        }

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LedgerError::Notification(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| LedgerError::Notification(e.to_string()))?;
        Ok(())
    }

    /// Uploads the evidence screenshot with the caption and approval
    /// keyboard attached, so the operator decides off the image itself.
    async fn send_photo(
        &self,
        photo: Vec<u8>,
        caption: String,
        reply_markup: serde_json::Value,
    ) -> Result<()> {
        let url = format!("{}/sendPhoto", self.api_base);
        let part = reqwest::multipart::Part::bytes(photo).file_name("screenshot.png");
        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption)
            .text("parse_mode", "Markdown")
            .text("reply_markup", reply_markup.to_string())
            .part("photo", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LedgerError::Notification(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| LedgerError::Notification(e.to_string()))?;
        Ok(())
    }
}

fn approval_keyboard(txn_id: &str) -> serde_json::Value {
    json!({
        "inline_keyboard": [[
            { "text": "✅ Approve", "callback_data": format!("approve_{txn_id}") },
            { "text": "❌ Reject", "callback_data": format!("reject_{txn_id}") },
        ]]
    })
}

fn submission_caption(record: &PaymentRecord) -> String {
    let mut text = format!(
        "📩 *New Payment Request*\n\n👤 *Name:* {}\n💳 *Txn ID:* `{}`\n📦 *Product:* {}",
        record.user, record.txn_id, record.product
    );
    if let Some(amount) = &record.amount {
        text.push_str(&format!("\n💰 *Amount:* {amount}"));
    }
    text.push_str("\n⏳ *Status:* Pending Approval");
    text
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn payment_submitted(&self, record: &PaymentRecord) -> Result<()> {
        let caption = submission_caption(record);
        let keyboard = approval_keyboard(&record.txn_id);

        // Screenshot flows attach the evidence; checkout flows (and an
        // unreadable file) degrade to the plain text announcement.
        if let Some(path) = &record.ss_path
            && let Ok(photo) = tokio::fs::read(path).await
        {
            return self.send_photo(photo, caption, keyboard).await;
        }
        self.send_message(caption, Some(keyboard)).await
    }

    async fn payment_resolved(&self, record: &PaymentRecord) -> Result<()> {
        let text = match record.status {
            PaymentStatus::Approved => format!(
                "✅ *Payment Approved*\n\n👤 {}\n💳 `{}`\n🔓 Access Granted",
                record.user, record.txn_id
            ),
            PaymentStatus::Rejected => format!(
                "❌ *Payment Rejected*\n\n👤 {}\n💳 `{}`\n🚫 Access Denied",
                record.user, record.txn_id
            ),
            PaymentStatus::Pending => return Ok(()),
        };
        self.send_message(text, None).await
    }
}

/// Notifier that drops everything. Used when no operator channel is
/// configured and in tests.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn payment_submitted(&self, _record: &PaymentRecord) -> Result<()> {
        Ok(())
    }

    async fn payment_resolved(&self, _record: &PaymentRecord) -> Result<()> {
        Ok(())
    }
}
