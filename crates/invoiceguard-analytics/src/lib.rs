//! # invoiceguard-analytics
//!
//! Advanced analytics (checks 5.1-5.5 plus the 4.3 three-way match):
//!
//! - [`risk`]: weighted vendor risk composite and banding
//! - [`anomaly`]: z-score, pluggable outlier model and Benford's-law
//!   analysis over accumulated invoice features
//! - [`threshold`]: approval-threshold proximity and invoice splitting
//! - [`collusion`]: shared address/bank/phone links between vendors
//! - [`correlation`]: expense-to-activity correlation and PO/GRN matching

pub mod anomaly;
pub mod collusion;
pub mod correlation;
pub mod risk;
pub mod threshold;

pub use anomaly::{AnomalyEngine, DistanceOutlierModel, OutlierModel};
pub use collusion::{detect_collusion, VendorContacts};
pub use correlation::{expense_correlation, po_grn_match, ActivityContext};
pub use risk::compute_vendor_risk_score;
pub use threshold::{detect_threshold_circumvention, DEFAULT_THRESHOLDS};
