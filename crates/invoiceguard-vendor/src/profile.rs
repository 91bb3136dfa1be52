//! Vendor profile persistence interface.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use invoiceguard_types::VendorProfile;

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("profile i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Loads and saves vendor profiles.
///
/// `load` is total: an unknown vendor id yields the empty skeleton, and a
/// corrupt stored profile is treated as unknown rather than an error.
pub trait ProfileStore: Send + Sync {
    fn load(&self, vendor_id: &str) -> VendorProfile;

    fn save(&self, profile: &VendorProfile) -> Result<(), ProfileStoreError>;

    /// Atomic read-modify-write of one vendor's profile.
    ///
    /// Implementations must hold their lock across the whole sequence so
    /// that concurrent updates of the same vendor never lose a write.
    fn update(
        &self,
        vendor_id: &str,
        apply: &mut dyn FnMut(&mut VendorProfile),
    ) -> Result<(), ProfileStoreError>;
}

/// Profile store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, VendorProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, vendor_id: &str) -> VendorProfile {
        self.profiles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(vendor_id)
            .cloned()
            .unwrap_or_else(|| VendorProfile::empty(vendor_id))
    }

    fn save(&self, profile: &VendorProfile) -> Result<(), ProfileStoreError> {
        self.profiles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(profile.vendor_id.clone(), profile.clone());
        Ok(())
    }

    fn update(
        &self,
        vendor_id: &str,
        apply: &mut dyn FnMut(&mut VendorProfile),
    ) -> Result<(), ProfileStoreError> {
        let mut profiles = self.profiles.lock().unwrap_or_else(|e| e.into_inner());
        let profile = profiles
            .entry(vendor_id.to_string())
            .or_insert_with(|| VendorProfile::empty(vendor_id));
        apply(profile);
        Ok(())
    }
}
