//! Run and startup identifiers.

use md5::{Digest, Md5};
use uuid::Uuid;

/// Length of a startup identifier in hex characters.
pub const STARTUP_ID_LEN: usize = 12;

/// Generates a new run identifier (UUID v4).
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Derives the analytics key for one evaluated document.
///
/// The key is the first [`STARTUP_ID_LEN`] hex characters of
/// `md5(filename + run_id)`, so re-uploading the same file yields a new key.
#[must_use]
pub fn startup_id(filename: &str, run_id: &Uuid) -> String {
    let mut hasher = Md5::new();
    hasher.update(filename.as_bytes());
    hasher.update(run_id.to_string().as_bytes());
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(STARTUP_ID_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_run_id_is_v4() {
        assert_eq!(generate_run_id().get_version_num(), 4);
    }

    #[test]
    fn test_startup_id_is_truncated_md5() {
        let run_id = Uuid::nil();
        let id = startup_id("deck.pdf", &run_id);
        assert_eq!(id.len(), STARTUP_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        let mut hasher = Md5::new();
        hasher.update(b"deck.pdf00000000-0000-0000-0000-000000000000");
        let full = hex::encode(hasher.finalize());
        assert_eq!(id, full[..STARTUP_ID_LEN]);
    }

    #[test]
    fn test_startup_id_differs_per_run() {
        let a = startup_id("deck.pdf", &generate_run_id());
        let b = startup_id("deck.pdf", &generate_run_id());
        assert_ne!(a, b);
    }
}
