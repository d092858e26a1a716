use log::debug;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use url::Url;

use crate::config::WebhookConfig;
use crate::error::Error;

/// What a run has to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Change { url: String },
    Error { message: String },
}

/// Body accepted by the Maker webhook. The receiving applet reads the
/// fields positionally, so the layout is fixed.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookPayload {
    pub value1: String,
    pub value2: String,
    pub value3: String,
}

impl From<&NotificationEvent> for WebhookPayload {
    fn from(event: &NotificationEvent) -> Self {
        match event {
            NotificationEvent::Change { url } => Self {
                value1: "Change".to_string(),
                value2: url.clone(),
                value3: String::new(),
            },
            NotificationEvent::Error { message } => Self {
                value1: "Error".to_string(),
                value2: String::new(),
                value3: message.clone(),
            },
        }
    }
}

/// Fires events at `<base_url>/trigger/<event_name>/with/key/<key>`.
pub struct Notifier {
    client: Client,
    endpoint: Url,
}

impl Notifier {
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot carry a path.
    pub fn new(client: Client, webhook: &WebhookConfig) -> Result<Self, Error> {
        let mut endpoint = Url::parse(&webhook.base_url)?;
        endpoint
            .path_segments_mut()
            .map_err(|()| {
                Error::config(format!("webhook base URL {} cannot carry a path", webhook.base_url))
            })?
            .pop_if_empty()
            .extend([
                "trigger",
                webhook.event_name.as_str(),
                "with",
                "key",
                webhook.key.as_str(),
            ]);
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POSTs `event` and waits for the answer. Only HTTP 200 counts as delivered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotifyTransport`] if the request fails and
    /// [`Error::NotifyStatus`] for any status other than 200.
    pub async fn notify(&self, event: &NotificationEvent) -> Result<(), Error> {
        let payload = WebhookPayload::from(event);
        debug!("Sending {payload:?}");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(Error::NotifyTransport)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Error::NotifyStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn webhook(base_url: &str) -> WebhookConfig {
        WebhookConfig {
            event_name: "page_changed".to_string(),
            key: "s3cret".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn test_payload_layout() {
        let change = NotificationEvent::Change {
            url: "https://example.com".to_string(),
        };
        assert_eq!(
            serde_json::to_value(WebhookPayload::from(&change)).unwrap(),
            json!({"value1": "Change", "value2": "https://example.com", "value3": ""})
        );

        let error = NotificationEvent::Error {
            message: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(WebhookPayload::from(&error)).unwrap(),
            json!({"value1": "Error", "value2": "", "value3": "boom"})
        );
    }

    #[test]
    fn test_endpoint_layout() {
        let notifier = Notifier::new(Client::new(), &webhook("https://maker.ifttt.com")).unwrap();
        assert_eq!(
            notifier.endpoint().as_str(),
            "https://maker.ifttt.com/trigger/page_changed/with/key/s3cret"
        );

        let notifier =
            Notifier::new(Client::new(), &webhook("http://localhost:8080/hooks/")).unwrap();
        assert_eq!(
            notifier.endpoint().as_str(),
            "http://localhost:8080/hooks/trigger/page_changed/with/key/s3cret"
        );
    }

    #[test]
    fn test_endpoint_rejects_non_base_url() {
        assert!(Notifier::new(Client::new(), &webhook("mailto:someone@example.com")).is_err());
    }

    #[tokio::test]
    async fn test_notify_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/trigger/page_changed/with/key/s3cret"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "value1": "Change",
                "value2": "https://example.com",
                "value3": "",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(Client::new(), &webhook(&server.uri())).unwrap();
        notifier
            .notify(&NotificationEvent::Change {
                url: "https://example.com".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_notify_requires_exactly_200() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let notifier = Notifier::new(Client::new(), &webhook(&server.uri())).unwrap();
        let err = notifier
            .notify(&NotificationEvent::Error {
                message: "boom".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotifyStatus(status) if status == StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_notify_transport_failure() {
        let notifier = Notifier::new(Client::new(), &webhook("http://127.0.0.1:1")).unwrap();
        let err = notifier
            .notify(&NotificationEvent::Error {
                message: "boom".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotifyTransport(_)));
    }
}
