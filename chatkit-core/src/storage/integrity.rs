//! Snapshot checksums
//!
//! Persisted snapshots carry a `sha256:<hex>` tag over their payload, so a
//! truncated or hand-edited preferences file is caught on load instead of
//! being decoded into garbage.

use ring::digest::{Context, SHA256};
use thiserror::Error;

/// Checks `payload` against a tag produced by [`compute_checksum`].
///
/// ```
/// use chatkit_core::storage::{compute_checksum, verify_checksum};
///
/// let tag = compute_checksum(b"snapshot");
/// assert!(verify_checksum(b"snapshot", &tag).is_ok());
/// assert!(verify_checksum(b"snapshoT", &tag).is_err());
/// ```
pub fn verify_checksum(data: &[u8], expected: &str) -> Result<(), IntegrityError> {
    let expected = expected
        .strip_prefix(TAG_PREFIX)
        .ok_or(IntegrityError::InvalidFormat)?;

    let actual = sha256_hex(data);
    if actual != expected {
        return Err(IntegrityError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

/// Tags `payload` for storage alongside it.
pub fn compute_checksum(payload: &[u8]) -> String {
    format!("{}{}", TAG_PREFIX, sha256_hex(payload))
}

const TAG_PREFIX: &str = "sha256:";

fn sha256_hex(data: &[u8]) -> String {
    let mut context = Context::new(&SHA256);
    context.update(data);
    hex::encode(context.finish().as_ref())
}

/// A snapshot tag that is malformed or does not match its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("snapshot tag is not of the form 'sha256:<hex>'")]
    InvalidFormat,

    /// Hex digests, without the prefix.
    #[error("snapshot checksum mismatch: stored {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_prefixed_sha256() {
        let tag = compute_checksum(b"hello world");
        assert_eq!(
            tag,
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert!(verify_checksum(b"hello world", &tag).is_ok());
    }

    #[test]
    fn test_rejects_tampered_data() {
        let checksum = compute_checksum(b"payload");
        assert!(matches!(
            verify_checksum(b"payloae", &checksum),
            Err(IntegrityError::ChecksumMismatch { .. })
        ));
        assert_eq!(
            verify_checksum(b"payload", "md5:abc"),
            Err(IntegrityError::InvalidFormat)
        );
    }
}
