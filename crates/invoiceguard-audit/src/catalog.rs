//! The fixed 26-check catalog.
//!
//! The catalog is part of the external contract: check ids, names and
//! category grouping are stable across releases, and every audit report
//! carries exactly one result per entry, in catalog order.

use invoiceguard_types::{CheckCategory, CheckDefinition};

use CheckCategory::{
    AdvancedAnalytics, DuplicateDetection, MetadataIntegrity, StatutoryValidation, VendorHistory,
};

pub const CATALOG: [CheckDefinition; 26] = [
    CheckDefinition {
        id: "1.1",
        category: MetadataIntegrity,
        name: "PDF/Image Metadata Tampering Detection",
        risk_indicator: "Modified invoices suggest tampering with amounts/dates/vendor details.",
    },
    CheckDefinition {
        id: "1.2",
        category: MetadataIntegrity,
        name: "Image Forensics - Error Level Analysis (ELA)",
        risk_indicator: "Localized ELA spikes can indicate edited fields.",
    },
    CheckDefinition {
        id: "1.3",
        category: MetadataIntegrity,
        name: "Font Consistency Analysis",
        risk_indicator: "Font mismatches can indicate cut-paste edits.",
    },
    CheckDefinition {
        id: "1.4",
        category: MetadataIntegrity,
        name: "Document Orientation & Quality Score",
        risk_indicator: "Screen photos/re-scans may hide origin trail.",
    },
    CheckDefinition {
        id: "2.1",
        category: StatutoryValidation,
        name: "GSTIN Validation & Cross-Verification",
        risk_indicator: "Invalid/cancelled GSTIN may indicate shell vendor risk.",
    },
    CheckDefinition {
        id: "2.2",
        category: StatutoryValidation,
        name: "PAN Validation & Linkage Check",
        risk_indicator: "PAN mismatch can indicate identity fraud.",
    },
    CheckDefinition {
        id: "2.3",
        category: StatutoryValidation,
        name: "HSN/SAC Code Validation",
        risk_indicator: "Wrong HSN/SAC can indicate tax evasion risk.",
    },
    CheckDefinition {
        id: "2.4",
        category: StatutoryValidation,
        name: "GST Calculation & Check Sum Validation",
        risk_indicator: "Math mismatches can suggest manual manipulation.",
    },
    CheckDefinition {
        id: "2.5",
        category: StatutoryValidation,
        name: "Invoice Number Format & Sequence Validation",
        risk_indicator: "Sequence gaps/duplicates may indicate fake invoicing.",
    },
    CheckDefinition {
        id: "2.6",
        category: StatutoryValidation,
        name: "Bank Account Validation (IFSC & Account)",
        risk_indicator: "Bank detail changes are a common fraud vector.",
    },
    CheckDefinition {
        id: "2.7",
        category: StatutoryValidation,
        name: "E-Invoice / IRN Validation",
        risk_indicator: "Missing/fake IRN can indicate bogus ITC claims.",
    },
    CheckDefinition {
        id: "3.1",
        category: VendorHistory,
        name: "Invoice Template Consistency Check",
        risk_indicator: "Sudden template changes may indicate counterfeit invoices.",
    },
    CheckDefinition {
        id: "3.2",
        category: VendorHistory,
        name: "Pricing Variance Analysis",
        risk_indicator: "Price spikes can indicate inflation/collusion.",
    },
    CheckDefinition {
        id: "3.3",
        category: VendorHistory,
        name: "Invoice Frequency & Amount Pattern Analysis",
        risk_indicator: "Abnormal submission patterns suggest splitting/ghost invoicing.",
    },
    CheckDefinition {
        id: "3.4",
        category: VendorHistory,
        name: "Address & Contact Information Consistency",
        risk_indicator: "Address mismatch may indicate vendor substitution fraud.",
    },
    CheckDefinition {
        id: "3.5",
        category: VendorHistory,
        name: "Terms & Conditions Variance",
        risk_indicator: "Unapproved T&C changes can favor vendor unfairly.",
    },
    CheckDefinition {
        id: "4.1",
        category: DuplicateDetection,
        name: "Exact Duplicate Invoice Detection",
        risk_indicator: "Exact duplicates are critical double-billing attempts.",
    },
    CheckDefinition {
        id: "4.2",
        category: DuplicateDetection,
        name: "Near-Duplicate Detection (Fuzzy Matching)",
        risk_indicator: "Near-duplicates indicate sophisticated evasion.",
    },
    CheckDefinition {
        id: "4.3",
        category: DuplicateDetection,
        name: "Cross-Reference PO/GRN Matching",
        risk_indicator: "3-way mismatches indicate over/false billing.",
    },
    CheckDefinition {
        id: "4.4",
        category: DuplicateDetection,
        name: "Image Hash / Perceptual Duplicate Detection",
        risk_indicator: "Same invoice image resubmission indicates replay fraud.",
    },
    CheckDefinition {
        id: "4.5",
        category: DuplicateDetection,
        name: "OCR Content Duplicate Detection",
        risk_indicator: "High text similarity with changed headers indicates manipulation.",
    },
    CheckDefinition {
        id: "5.1",
        category: AdvancedAnalytics,
        name: "Vendor Risk Scoring",
        risk_indicator: "Composite score helps risk-based payment controls.",
    },
    CheckDefinition {
        id: "5.2",
        category: AdvancedAnalytics,
        name: "Anomaly Detection - Statistical Outliers",
        risk_indicator: "ML outliers help detect novel fraud patterns.",
    },
    CheckDefinition {
        id: "5.3",
        category: AdvancedAnalytics,
        name: "Invoice-Expense Correlation Check",
        risk_indicator: "Expenses without activity context can be fictitious.",
    },
    CheckDefinition {
        id: "5.4",
        category: AdvancedAnalytics,
        name: "Multi-Vendor Collusion Detection",
        risk_indicator: "Shared attributes may indicate collusion networks.",
    },
    CheckDefinition {
        id: "5.5",
        category: AdvancedAnalytics,
        name: "Approval Threshold Circumvention Detection",
        risk_indicator: "Near-threshold clustering suggests invoice splitting.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_twenty_six_entries() {
        assert_eq!(CATALOG.len(), 26);
    }

    #[test]
    fn ids_are_unique_and_sorted() {
        let ids: Vec<&str> = CATALOG.iter().map(|d| d.id).collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 26);
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn category_sizes_are_fixed() {
        let count = |c: CheckCategory| CATALOG.iter().filter(|d| d.category == c).count();
        assert_eq!(count(MetadataIntegrity), 4);
        assert_eq!(count(StatutoryValidation), 7);
        assert_eq!(count(VendorHistory), 5);
        assert_eq!(count(DuplicateDetection), 5);
        assert_eq!(count(AdvancedAnalytics), 5);
    }

    #[test]
    fn every_entry_names_its_risk() {
        for defn in &CATALOG {
            assert!(!defn.name.is_empty());
            assert!(!defn.risk_indicator.is_empty());
        }
    }
}
