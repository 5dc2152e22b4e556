//! License-key activation.
//!
//! Keys are compared against a fixed allow-list compiled into the binary.
//! This is a convenience gate, not a security boundary.

use estudio_error::{EstudioResult, JsonError};
use estudio_gallery::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Store key holding the accepted license key.
pub const ACTIVATION_KEY: &str = "estudio-activation";

/// Accepted license keys, already normalized.
pub const LICENSE_KEYS: &[&str] = &[
    "ESTUDIO-2024-CRIADOR",
    "ESTUDIO-PRO-7F3K-92QX",
    "ESTUDIO-AGENCIA-4M8P",
    "ESTUDIO-BETA-TESTER",
    "ESTUDIO-VITALICIO-ROXO",
];

/// Trim surrounding whitespace and uppercase.
pub fn normalize_key(candidate: &str) -> String {
    candidate.trim().to_uppercase()
}

fn is_listed(key: &str) -> bool {
    LICENSE_KEYS.contains(&key)
}

/// Checks keys and remembers a successful activation.
#[derive(Debug, Clone)]
pub struct ActivationGate {
    store: Arc<dyn KeyValueStore>,
}

impl ActivationGate {
    /// Create a gate persisting into `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Check a candidate key.
    ///
    /// A listed key is stored in normalized form and `true` is returned.
    /// Anything else returns `false` and leaves the store untouched. There is
    /// no attempt limit.
    #[instrument(skip_all)]
    pub fn check_key(&self, candidate: &str) -> EstudioResult<bool> {
        let key = normalize_key(candidate);
        if !is_listed(&key) {
            debug!("License key rejected");
            return Ok(false);
        }

        let encoded = serde_json::to_string(&key)
            .map_err(|e| JsonError::new(format!("Failed to encode license key: {}", e)))?;
        self.store.set(ACTIVATION_KEY, &encoded)?;
        info!("Activated");
        Ok(true)
    }

    /// Whether a listed key is stored.
    ///
    /// A stored key that is no longer listed, or that cannot be decoded,
    /// counts as not activated.
    pub fn is_activated(&self) -> EstudioResult<bool> {
        let Some(raw) = self.store.get(ACTIVATION_KEY)? else {
            return Ok(false);
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(key) => Ok(is_listed(&normalize_key(&key))),
            Err(e) => {
                debug!(error = %e, "Stored license key is unreadable");
                Ok(false)
            }
        }
    }

    /// Forget the stored key.
    #[instrument(skip(self))]
    pub fn deactivate(&self) -> EstudioResult<()> {
        self.store.remove(ACTIVATION_KEY)?;
        info!("Deactivated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  estudio-beta-tester\n"), "ESTUDIO-BETA-TESTER");
    }

    #[test]
    fn test_allow_list_is_normalized() {
        for key in LICENSE_KEYS {
            assert_eq!(normalize_key(key), *key);
        }
    }
}
