use log::debug;

use crate::config::Target;
use crate::digest::Digest;
use crate::error::Error;
use crate::extract::extract;
use crate::fetch::Fetcher;
use crate::state::StateStore;

/// The digest seen now next to the one saved last time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub current: Digest,
    pub previous: Option<Digest>,
}

impl Observation {
    /// True unless the saved digest is byte-for-byte the current one.
    /// With no saved digest this is always true.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.previous != Some(self.current)
    }
}

pub struct ChangeDetector<'a> {
    fetcher: &'a Fetcher,
    store: &'a StateStore,
    target: &'a Target,
}

impl<'a> ChangeDetector<'a> {
    #[must_use]
    pub fn new(fetcher: &'a Fetcher, store: &'a StateStore, target: &'a Target) -> Self {
        Self {
            fetcher,
            store,
            target,
        }
    }

    /// Fetches, extracts and fingerprints the target fragment.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Fetch`] and [`Error::Selector`].
    pub async fn current_digest(&self) -> Result<Digest, Error> {
        let document = self
            .fetcher
            .fetch(&self.target.url, self.target.user_agent.as_deref())
            .await?;
        let fragment = extract(&document, &self.target.selector)?;
        debug!("Extracted fragment: {fragment}");
        Ok(Digest::of(fragment.as_bytes()))
    }

    /// Computes the current digest, then loads the saved one.
    ///
    /// # Errors
    ///
    /// The first failing step wins; the saved state is not read if the
    /// page could not be fingerprinted.
    pub async fn check(&self) -> Result<Observation, Error> {
        let current = self.current_digest().await?;
        debug!("Current digest: {current}");
        let previous = self.store.read_previous().await?;
        debug!("Previous digest: {previous:?}");
        Ok(Observation { current, previous })
    }
}
