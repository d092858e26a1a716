//! Persistence of the last observed digest.
//!
//! The state file holds nothing but the lowercase hex of one [`Digest`].
//! A missing file is the normal first-run state, not an error.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::io::AsyncWriteExt;

use crate::digest::{DIGEST_LEN, Digest};
use crate::error::Error;

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the digest saved by the previous successful run.
    ///
    /// Returns `None` when there is no usable prior state: the file is
    /// missing, empty, or holds hex of the wrong length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateRead`] if the file exists but cannot be read and
    /// [`Error::StateDecode`] if it is not hex.
    pub async fn read_previous(&self) -> Result<Option<Digest>, Error> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No state at {}, treating as first run", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(Error::StateRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        let bytes = hex::decode(content).map_err(|source| Error::StateDecode {
            path: self.path.clone(),
            source,
        })?;

        if let Ok(digest) = Digest::try_from(bytes.as_slice()) {
            Ok(Some(digest))
        } else {
            warn!(
                "State file {} holds {} bytes instead of {DIGEST_LEN}, ignoring it",
                self.path.display(),
                bytes.len()
            );
            Ok(None)
        }
    }

    /// Replaces the saved digest.
    ///
    /// Writes to a sibling temp file and renames it into place so readers
    /// never see a partial file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateWrite`] on any filesystem failure.
    pub async fn write_previous(&self, digest: &Digest) -> Result<(), Error> {
        self.write_atomic(digest.to_hex().as_bytes())
            .await
            .map_err(|source| Error::StateWrite {
                path: self.path.clone(),
                source,
            })
    }

    async fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let result = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }
}
