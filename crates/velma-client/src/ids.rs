//! Unique-id generation for jobs and contacts.
//!
//! Velma correlates submissions through caller-supplied identifiers;
//! when the caller does not supply one, a hex id is derived from a
//! high-resolution clock reading local to the call. Generation is pure
//! in-memory work: no I/O, no ambient lock, no global counter, so
//! concurrent calls across packets stay collision-safe.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated ids in hex characters.
const ID_LEN: usize = 40;

/// Generate a fresh unique id: 40 lowercase hex characters.
///
/// Hashes the current nanosecond timestamp together with a random salt
/// so that two calls within the same clock tick still diverge.
pub fn generate_unique_id() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros());
    let salt: u64 = rand::thread_rng().gen();

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_be_bytes());
    hasher.update(salt.to_be_bytes());
    let digest = hasher.finalize();

    hex::encode(&digest[..ID_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn id_is_lowercase_hex_of_expected_length() {
        let id = generate_unique_id();
        assert_eq!(id.len(), 40);
        assert!(is_lower_hex(&id), "not lowercase hex: {}", id);
    }

    #[test]
    fn id_fits_service_pattern_bounds() {
        // The service accepts 5–40 hex chars.
        let id = generate_unique_id();
        assert!(id.len() >= 5 && id.len() <= 40);
    }

    #[test]
    fn consecutive_ids_differ() {
        let a = generate_unique_id();
        let b = generate_unique_id();
        assert_ne!(a, b);
    }

    #[test]
    fn burst_of_ids_has_no_collisions() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_unique_id()));
        }
    }
}
