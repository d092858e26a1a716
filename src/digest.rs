use std::fmt;

use sha1::{Digest as _, Sha1};

/// Length in bytes of a content fingerprint.
pub const DIGEST_LEN: usize = 20;

/// SHA-1 fingerprint of an extracted page fragment.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Fingerprints `content`. Same bytes, same digest, on every run.
    #[must_use]
    pub fn of(content: &[u8]) -> Self {
        let hash = Sha1::digest(content);
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex, the on-disk form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = std::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        let content = b"<div id=\"news\">hello</div>";
        assert_eq!(Digest::of(content), Digest::of(content));
        assert_ne!(Digest::of(content), Digest::of(b"<div id=\"news\">bye</div>"));
    }

    #[test]
    fn test_digest_matches_known_sha1() {
        assert_eq!(
            Digest::of(b"").to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            Digest::of(b"abc").to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_hex_decodes_back_to_same_digest() {
        let digest = Digest::of(b"some fragment");
        let decoded = hex::decode(digest.to_hex()).unwrap();
        assert_eq!(Digest::try_from(decoded.as_slice()).unwrap(), digest);
        assert_eq!(digest.to_hex(), digest.to_hex().to_lowercase());
        assert_eq!(digest.to_hex().len(), DIGEST_LEN * 2);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(Digest::try_from(&[0u8; 19][..]).is_err());
        assert!(Digest::try_from(&[0u8; 0][..]).is_err());
    }
}
