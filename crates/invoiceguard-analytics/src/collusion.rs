//! Multi-vendor collusion detection (check 5.4).

use std::collections::HashMap;

use invoiceguard_types::{CollusionReport, VendorLink};

/// Contact attributes of one vendor in the master data set.
#[derive(Clone, Debug, Default)]
pub struct VendorContacts {
    pub id: String,
    pub address: Option<String>,
    pub bank_account: Option<String>,
    pub phone: Option<String>,
}

/// Flag vendors sharing an address, bank account or phone number. Each
/// shared attribute links a vendor to the first holder of that value;
/// every link adds 25 to the collusion score, capped at 100.
pub fn detect_collusion(vendors: &[VendorContacts]) -> CollusionReport {
    if vendors.len() < 2 {
        return CollusionReport {
            data_missing: true,
            reason: Some("Need 2+ vendors for analysis.".to_string()),
            vendors_analyzed: vendors.len() as u32,
            ..CollusionReport::default()
        };
    }

    let mut alerts = Vec::new();
    let mut relationships = Vec::new();
    let mut addresses: HashMap<String, &str> = HashMap::new();
    let mut bank_accounts: HashMap<String, &str> = HashMap::new();
    let mut phones: HashMap<String, &str> = HashMap::new();

    for vendor in vendors {
        let vid = vendor.id.as_str();

        if let Some(addr) = normalized(vendor.address.as_deref()) {
            if let Some(holder) = addresses.get(&addr) {
                relationships.push(VendorLink {
                    kind: "same_address".to_string(),
                    vendors: format!("{holder} & {vid}"),
                });
                alerts.push(format!(
                    "Vendors {holder} and {vid} share the same address."
                ));
            } else {
                addresses.insert(addr, vid);
            }
        }

        if let Some(bank) = normalized(vendor.bank_account.as_deref()) {
            if let Some(holder) = bank_accounts.get(&bank) {
                relationships.push(VendorLink {
                    kind: "same_bank_account".to_string(),
                    vendors: format!("{holder} & {vid}"),
                });
                alerts.push(format!("Vendors {holder} and {vid} share bank account."));
            } else {
                bank_accounts.insert(bank, vid);
            }
        }

        if let Some(phone) = normalized(vendor.phone.as_deref()) {
            if let Some(holder) = phones.get(&phone) {
                relationships.push(VendorLink {
                    kind: "same_phone".to_string(),
                    vendors: format!("{holder} & {vid}"),
                });
            } else {
                phones.insert(phone, vid);
            }
        }
    }

    let collusion_score = (relationships.len() as u32 * 25).min(100);

    CollusionReport {
        collusion_detected: !relationships.is_empty(),
        data_missing: false,
        collusion_score,
        relationships,
        alerts,
        vendors_analyzed: vendors.len() as u32,
        reason: None,
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(id: &str, address: &str, bank: &str, phone: &str) -> VendorContacts {
        VendorContacts {
            id: id.to_string(),
            address: (!address.is_empty()).then(|| address.to_string()),
            bank_account: (!bank.is_empty()).then(|| bank.to_string()),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        }
    }

    #[test]
    fn single_vendor_is_insufficient_data() {
        let r = detect_collusion(&[vendor("v1", "12 MG Road", "", "")]);
        assert!(r.data_missing);
        assert!(!r.collusion_detected);
    }

    #[test]
    fn independent_vendors_are_clean() {
        let r = detect_collusion(&[
            vendor("v1", "12 MG Road", "111122223333", "9811111111"),
            vendor("v2", "99 Park St", "444455556666", "9822222222"),
        ]);
        assert!(!r.collusion_detected);
        assert_eq!(r.collusion_score, 0);
        assert_eq!(r.vendors_analyzed, 2);
    }

    #[test]
    fn shared_address_is_detected_case_insensitively() {
        let r = detect_collusion(&[
            vendor("v1", "12 MG Road, Pune", "111122223333", ""),
            vendor("v2", "12 mg road, pune", "444455556666", ""),
        ]);
        assert!(r.collusion_detected);
        assert_eq!(r.collusion_score, 25);
        assert_eq!(r.relationships[0].kind, "same_address");
        assert_eq!(r.relationships[0].vendors, "v1 & v2");
        assert!(r.alerts[0].contains("share the same address"));
    }

    #[test]
    fn multiple_links_raise_the_score() {
        let r = detect_collusion(&[
            vendor("v1", "12 MG Road", "111122223333", "9811111111"),
            vendor("v2", "12 MG Road", "111122223333", "9811111111"),
        ]);
        assert_eq!(r.relationships.len(), 3);
        assert_eq!(r.collusion_score, 75);
    }

    #[test]
    fn score_caps_at_one_hundred() {
        let shared = vendor("x", "12 MG Road", "111122223333", "9811111111");
        let vendors: Vec<VendorContacts> = (0..4)
            .map(|i| VendorContacts {
                id: format!("v{i}"),
                ..shared.clone()
            })
            .collect();
        let r = detect_collusion(&vendors);
        assert_eq!(r.collusion_score, 100);
    }
}
