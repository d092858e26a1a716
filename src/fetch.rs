use log::{debug, warn};
use reqwest::Client;
use reqwest::header::USER_AGENT;

use crate::error::Error;

/// Downloads the monitored page.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a single GET on `url` and returns the body, whatever the status.
    ///
    /// Pages that answer with an error status still carry markup worth
    /// fingerprinting, so the status is only logged. An empty `user_agent`
    /// sends no header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] on connection, DNS, timeout or body read failure.
    pub async fn fetch(&self, url: &str, user_agent: Option<&str>) -> Result<Vec<u8>, Error> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent.filter(|agent| !agent.is_empty()) {
            debug!("Setting User-Agent: {agent}");
            request = request.header(USER_AGENT, agent);
        }

        let fetch_error = |source: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(fetch_error)?;
        let status = response.status();
        if status.is_success() {
            debug!("{url}: {status}");
        } else {
            warn!("{url} answered {status}, using the body anyway");
        }

        let body = response.bytes().await.map_err(fetch_error)?;
        debug!("Fetched {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }
}
