//! Emoji catalogue model and snapshot codec.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{compute_checksum, verify_checksum, IntegrityError};

/// Snapshot format version.
const SNAPSHOT_VERSION: u8 = 1;

/// Upper bound on a decoded snapshot, guards against corrupt length prefixes.
const MAX_SNAPSHOT_BYTES: u64 = 8 * 1024 * 1024;

/// A single emoji.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emoji {
    /// Key used in reactions.
    pub key: String,
    /// Image URL.
    pub url: String,
}

/// An ordered group of emojis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCategory {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub emojis: Vec<Emoji>,
}

/// The full catalogue as delivered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmojiContainer {
    /// Server-issued version token for this content.
    pub emoji_hash: String,
    pub categories: Vec<EmojiCategory>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u8,
    checksum: String,
    payload: Vec<u8>,
}

/// Errors decoding or encoding a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("binary codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_SNAPSHOT_BYTES)
}

/// Encodes a container as text: bincode payload + SHA-256 envelope, base64.
pub fn encode_container(container: &EmojiContainer) -> Result<String, SnapshotError> {
    let payload = codec().serialize(container)?;
    let envelope = SnapshotEnvelope {
        version: SNAPSHOT_VERSION,
        checksum: compute_checksum(&payload),
        payload,
    };
    Ok(STANDARD.encode(codec().serialize(&envelope)?))
}

/// Decodes text produced by [`encode_container`].
pub fn decode_container(data: &str) -> Result<EmojiContainer, SnapshotError> {
    let bytes = STANDARD.decode(data.trim())?;
    let envelope: SnapshotEnvelope = codec().deserialize(&bytes)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(envelope.version));
    }
    verify_checksum(&envelope.payload, &envelope.checksum)?;
    Ok(codec().deserialize(&envelope.payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmojiContainer {
        EmojiContainer {
            emoji_hash: "abc".into(),
            categories: vec![EmojiCategory {
                id: 1,
                name: "Faces".into(),
                url: "https://cdn/faces.png".into(),
                emojis: vec![Emoji {
                    key: "smile".into(),
                    url: "https://cdn/smile.png".into(),
                }],
            }],
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            decode_container("not base64!!"),
            Err(SnapshotError::Base64(_))
        ));
        assert!(decode_container(&STANDARD.encode(b"\x01\x02")).is_err());
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let payload = codec().serialize(&sample()).unwrap();
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            checksum: compute_checksum(b"something else"),
            payload,
        };
        let text = STANDARD.encode(codec().serialize(&envelope).unwrap());
        assert!(matches!(
            decode_container(&text),
            Err(SnapshotError::Integrity(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let payload = codec().serialize(&sample()).unwrap();
        let envelope = SnapshotEnvelope {
            version: 9,
            checksum: compute_checksum(&payload),
            payload,
        };
        let text = STANDARD.encode(codec().serialize(&envelope).unwrap());
        assert!(matches!(
            decode_container(&text),
            Err(SnapshotError::UnsupportedVersion(9))
        ));
    }
}
