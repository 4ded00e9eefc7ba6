//! Logs each update in before() and the outcome in after(); always continues.

use async_trait::async_trait;
use stats_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            chat_kind = message.chat.kind.as_str(),
            kind = ?message.kind,
            attachment = ?message.attachment,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(message_id = %message.id, response = ?response, "Processed message");
        Ok(())
    }
}
