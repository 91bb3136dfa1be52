//! # invoiceguard-vendor
//!
//! Per-vendor history and drift analysis (checks 3.1-3.5):
//!
//! - **Template consistency**: perceptual-hash distance to the vendor's
//!   known invoice layouts
//! - **Pricing variance**: unit prices against per-item history
//! - **Frequency patterns**: amount spikes, round-number ratios, submission
//!   cadence
//! - **Address consistency** and **terms variance**
//!
//! All analyses are pure reads of a [`VendorProfile`](invoiceguard_types::VendorProfile)
//! snapshot; [`record_invoice`] applies every profile mutation in one place
//! after analysis, so an invoice is never compared against itself.

pub mod analysis;
pub mod profile;

pub use analysis::{
    address_consistency, frequency_patterns, pricing_variance, record_invoice,
    template_consistency, terms_variance, InvoiceObservation,
};
pub use profile::{InMemoryProfileStore, ProfileStore, ProfileStoreError};
