//! JSON-file vendor profile store.
//!
//! One file per vendor, `vendor_<id>.json`, under a configured data
//! directory. Loads are total: a missing or corrupt file yields the empty
//! profile skeleton.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use invoiceguard_types::VendorProfile;
use invoiceguard_vendor::{ProfileStore, ProfileStoreError};

pub struct JsonProfileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles in `update`.
    write_lock: Mutex<()>,
}

impl JsonProfileStore {
    /// Open (and create if needed) the profile directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ProfileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn profile_path(&self, vendor_id: &str) -> PathBuf {
        // Vendor ids come from tax ids or OCR text; keep the file name safe.
        let safe: String = vendor_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("vendor_{safe}.json"))
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self, vendor_id: &str) -> VendorProfile {
        let path = self.profile_path(vendor_id);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(vendor_id, error = %e, "corrupt vendor profile, starting fresh");
                VendorProfile::empty(vendor_id)
            }),
            Err(_) => VendorProfile::empty(vendor_id),
        }
    }

    fn save(&self, profile: &VendorProfile) -> Result<(), ProfileStoreError> {
        let path = self.profile_path(&profile.vendor_id);
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn update(
        &self,
        vendor_id: &str,
        apply: &mut dyn FnMut(&mut VendorProfile),
    ) -> Result<(), ProfileStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut profile = self.load(vendor_id);
        apply(&mut profile);
        self.save(&profile)
    }
}
