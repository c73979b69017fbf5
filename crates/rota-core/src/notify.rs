//! Pick announcements.
//!
//! The engine never calls the notifier; the HTTP layer and the scheduler
//! announce after a successful commit, and a delivery failure is theirs to
//! log — it must not unwind a write that already landed.

use serde_json::json;

use crate::error::{Result, RotaError};

pub trait Notifier: Send + Sync {
    fn send(&self, text: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SlackNotifier
// ---------------------------------------------------------------------------

/// Posts messages to a Slack incoming webhook.
pub struct SlackNotifier {
    webhook_url: String,
    channel: Option<String>,
    username: Option<String>,
    client: reqwest::blocking::Client,
}

impl SlackNotifier {
    pub fn new(
        webhook_url: impl Into<String>,
        channel: Option<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            channel,
            username,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Notifier for SlackNotifier {
    fn send(&self, text: &str) -> Result<()> {
        let mut payload = json!({ "text": text });
        if let Some(channel) = &self.channel {
            payload["channel"] = json!(channel);
        }
        if let Some(username) = &self.username {
            payload["username"] = json!(username);
        }

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .map_err(|e| RotaError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RotaError::Notify(format!(
                "slack webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// NoopNotifier
// ---------------------------------------------------------------------------

/// Stand-in when no webhook is configured. Logs the message instead.
#[derive(Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&self, text: &str) -> Result<()> {
        tracing::info!(message = text, "notification (no webhook configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_text_to_webhook() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/hook")
            .match_body(mockito::Matcher::PartialJson(
                serde_json::json!({"text": "picked: alice", "channel": "#oncall"}),
            ))
            .with_status(200)
            .create();

        let notifier = SlackNotifier::new(
            format!("{}/hook", server.url()),
            Some("#oncall".to_string()),
            None,
        );
        notifier.send("picked: alice").unwrap();
        mock.assert();
    }

    #[test]
    fn non_success_status_is_a_notify_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("POST", "/hook").with_status(500).create();

        let notifier = SlackNotifier::new(format!("{}/hook", server.url()), None, None);
        assert!(matches!(
            notifier.send("hello"),
            Err(RotaError::Notify(_))
        ));
    }

    #[test]
    fn noop_notifier_always_succeeds() {
        NoopNotifier.send("anything").unwrap();
    }
}
