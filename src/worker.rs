use log::{error, info, warn};
use reqwest::Client;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::{Config, Target};
use crate::detector::ChangeDetector;
use crate::error::Error;
use crate::fetch::Fetcher;
use crate::notify::{NotificationEvent, Notifier};
use crate::state::StateStore;

/// How a single check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Unchanged,
    Changed,
    FetchOrExtractError,
    StateIoError,
    /// The change notification was not delivered; nothing was persisted so
    /// the next run reports the same change again.
    NotifyError,
}

impl RunOutcome {
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Unchanged | Self::Changed)
    }

    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    fn from_failure(err: &Error) -> Self {
        match err {
            Error::StateRead { .. } | Error::StateDecode { .. } | Error::StateWrite { .. } => {
                Self::StateIoError
            }
            Error::NotifyStatus(_) | Error::NotifyTransport(_) => Self::NotifyError,
            _ => Self::FetchOrExtractError,
        }
    }
}

/// One watched fragment with everything needed to check it once.
pub struct Monitor {
    target: Target,
    fetcher: Fetcher,
    store: StateStore,
    notifier: Notifier,
}

impl Monitor {
    /// Builds the shared HTTP client and the collaborators around it.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the webhook URL is unusable.
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        Ok(Self {
            notifier: Notifier::new(client.clone(), &config.webhook)?,
            fetcher: Fetcher::new(client),
            store: StateStore::new(config.state.path),
            target: config.target,
        })
    }

    /// Checks the target once.
    ///
    /// # Behavior
    ///
    /// - Fetch, extract or state read failure: best-effort error
    ///   notification, nothing persisted
    /// - Changed: change notification first, the new digest is saved only
    ///   once the webhook accepted it
    /// - Unchanged: the digest is saved, nothing is sent
    /// - State write failure: best-effort error notification
    ///
    /// At most one notification is delivered per successful run.
    pub async fn run(&self) -> RunOutcome {
        let url = &self.target.url;
        info!("Checking {url} ({})", self.target.selector);

        let detector = ChangeDetector::new(&self.fetcher, &self.store, &self.target);
        let observation = match detector.check().await {
            Ok(observation) => observation,
            Err(e) => {
                self.report_failure(&e).await;
                return RunOutcome::from_failure(&e);
            }
        };

        let changed = observation.is_changed();
        if changed {
            info!("{url}: CHANGED");
            let event = NotificationEvent::Change { url: url.clone() };
            if let Err(e) = self.notifier.notify(&event).await {
                error!("Change notification failed, state left untouched: {e}");
                return RunOutcome::from_failure(&e);
            }
            info!("Change notification delivered");
        } else {
            info!("{url}: UNCHANGED");
        }

        if let Err(e) = self.store.write_previous(&observation.current).await {
            self.report_failure(&e).await;
            return RunOutcome::from_failure(&e);
        }
        info!(
            "Saved digest {} to {}",
            observation.current,
            self.store.path().display()
        );

        if changed {
            RunOutcome::Changed
        } else {
            RunOutcome::Unchanged
        }
    }

    // The run has already failed; a failing webhook must not make it worse.
    async fn report_failure(&self, err: &Error) {
        error!("{err}");
        let event = NotificationEvent::Error {
            message: err.to_string(),
        };
        match self.notifier.notify(&event).await {
            Ok(()) => info!("Error notification delivered"),
            Err(e) => warn!("Error notification failed: {e}"),
        }
    }
}
