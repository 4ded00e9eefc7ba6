//! # Handler chain
//!
//! Every update runs through the same handlers: all `before` in order (any `false` stops the
//! chain, which is how the tracker drops banned senders and edits), then `handle` until one
//! returns Stop or Reply, then all `after` in reverse.

use std::sync::Arc;

use stats_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, instrument};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        for h in &self.handlers {
            if !h.before(message).await? {
                let name = std::any::type_name_of_val(h.as_ref());
                debug!(handler = %name, message_id = %message.id, "before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let response = h.handle(message).await?;
            match response {
                HandlerResponse::Continue => {}
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    let name = std::any::type_name_of_val(h.as_ref());
                    debug!(handler = %name, response = ?response, "chain stopped by handler");
                    final_response = response;
                    break;
                }
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        Ok(final_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use stats_core::{Chat, MessageKind, User};
    use std::sync::Mutex;

    /// Records which phases ran, tagged with its name.
    struct Probe {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        before: bool,
        response: HandlerResponse,
    }

    impl Probe {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                before: true,
                response: HandlerResponse::Continue,
            }
        }

        fn push(&self, phase: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.name, phase));
        }
    }

    #[async_trait]
    impl Handler for Probe {
        async fn before(&self, _message: &Message) -> Result<bool> {
            self.push("before");
            Ok(self.before)
        }

        async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
            self.push("handle");
            Ok(self.response.clone())
        }

        async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
            self.push("after");
            Ok(())
        }
    }

    fn message() -> Message {
        Message {
            id: "1".to_string(),
            user: User {
                id: 10,
                username: None,
                first_name: "Ann".to_string(),
                last_name: None,
            },
            chat: Chat::private(10),
            content: "hi".to_string(),
            attachment: None,
            kind: MessageKind::New,
            created_at: Utc::now(),
        }
    }

    /// **Test: Phases run before-all, handle until Reply, after in reverse.**
    #[tokio::test]
    async fn test_phase_order_and_reply_stops_handle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut replier = Probe::new("b", &log);
        replier.response = HandlerResponse::Reply("ok".to_string());
        let chain = HandlerChain::new()
            .add_handler(Arc::new(Probe::new("a", &log)))
            .add_handler(Arc::new(replier))
            .add_handler(Arc::new(Probe::new("c", &log)));

        let response = chain.handle(&message()).await.unwrap();

        assert_eq!(response, HandlerResponse::Reply("ok".to_string()));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "a:before", "b:before", "c:before", "a:handle", "b:handle", "c:after", "b:after",
                "a:after",
            ]
        );
    }

    /// **Test: A false before() skips every later phase.**
    #[tokio::test]
    async fn test_before_false_stops_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut gate = Probe::new("gate", &log);
        gate.before = false;
        let chain = HandlerChain::new()
            .add_handler(Arc::new(gate))
            .add_handler(Arc::new(Probe::new("cmd", &log)));

        let response = chain.handle(&message()).await.unwrap();

        assert_eq!(response, HandlerResponse::Stop);
        assert_eq!(*log.lock().unwrap(), vec!["gate:before"]);
    }
}
