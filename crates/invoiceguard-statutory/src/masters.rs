//! Fixed reference data: GST state codes, PAN entity types, HSN/SAC rate
//! master.

/// Expected GST rate and description for a classification code.
#[derive(Clone, Copy, Debug)]
pub struct HsnEntry {
    pub code: &'static str,
    pub description: &'static str,
    pub rate: f64,
    pub code_type: &'static str,
}

/// Common HSN (goods) and SAC (services) codes with their notified rates.
pub const HSN_SAC_MASTER: &[HsnEntry] = &[
    HsnEntry { code: "9983", description: "Professional services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9984", description: "Telecommunication services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9985", description: "Transport services", rate: 5.0, code_type: "SAC" },
    HsnEntry { code: "9986", description: "Rental services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9987", description: "Maintenance and repair", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9988", description: "Manufacturing services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9971", description: "Financial services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9972", description: "Real estate services", rate: 12.0, code_type: "SAC" },
    HsnEntry { code: "9973", description: "Leasing services", rate: 18.0, code_type: "SAC" },
    HsnEntry { code: "9954", description: "Construction services", rate: 12.0, code_type: "SAC" },
    HsnEntry { code: "9961", description: "Education services", rate: 0.0, code_type: "SAC" },
    HsnEntry { code: "9963", description: "Accommodation services", rate: 12.0, code_type: "SAC" },
    HsnEntry { code: "9964", description: "Passenger transport", rate: 5.0, code_type: "SAC" },
    HsnEntry { code: "9965", description: "Goods transport", rate: 5.0, code_type: "SAC" },
    HsnEntry { code: "8471", description: "Computers & peripherals", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8443", description: "Printers & scanners", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8523", description: "Storage media", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8504", description: "Electrical transformers", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8517", description: "Telephones & smartphones", rate: 12.0, code_type: "HSN" },
    HsnEntry { code: "7318", description: "Screws, bolts, nuts", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "3004", description: "Medicaments", rate: 12.0, code_type: "HSN" },
    HsnEntry { code: "3002", description: "Vaccines & blood products", rate: 5.0, code_type: "HSN" },
    HsnEntry { code: "1001", description: "Wheat", rate: 5.0, code_type: "HSN" },
    HsnEntry { code: "1006", description: "Rice", rate: 5.0, code_type: "HSN" },
    HsnEntry { code: "1701", description: "Sugar", rate: 5.0, code_type: "HSN" },
    HsnEntry { code: "2201", description: "Mineral water", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "2202", description: "Aerated drinks", rate: 28.0, code_type: "HSN" },
    HsnEntry { code: "4820", description: "Paper stationery", rate: 12.0, code_type: "HSN" },
    HsnEntry { code: "4901", description: "Printed books", rate: 0.0, code_type: "HSN" },
    HsnEntry { code: "6109", description: "T-shirts", rate: 5.0, code_type: "HSN" },
    HsnEntry { code: "6110", description: "Jerseys, pullovers", rate: 12.0, code_type: "HSN" },
    HsnEntry { code: "7308", description: "Iron/steel structures", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8415", description: "Air conditioners", rate: 28.0, code_type: "HSN" },
    HsnEntry { code: "8418", description: "Refrigerators", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8528", description: "Monitors & TVs", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "8703", description: "Motor vehicles", rate: 28.0, code_type: "HSN" },
    HsnEntry { code: "9401", description: "Seats & furniture", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "9403", description: "Other furniture", rate: 18.0, code_type: "HSN" },
    HsnEntry { code: "9503", description: "Toys", rate: 12.0, code_type: "HSN" },
];

/// Look up a code (exact, then 4-digit prefix for 6/8-digit codes).
pub fn lookup_hsn(code: &str) -> Option<&'static HsnEntry> {
    HSN_SAC_MASTER
        .iter()
        .find(|e| e.code == code)
        .or_else(|| {
            let prefix = code.get(..4)?;
            HSN_SAC_MASTER.iter().find(|e| e.code == prefix)
        })
}

/// PAN fourth-character entity type.
pub fn entity_type(code: char) -> Option<&'static str> {
    Some(match code {
        'C' => "Company",
        'P' => "Individual",
        'H' => "HUF",
        'F' => "Firm",
        'A' => "Association of Persons",
        'B' => "Body of Individuals",
        'T' => "Trust",
        'L' => "Local Authority",
        'J' => "Artificial Juridical Person",
        'G' => "Government",
        _ => return None,
    })
}

/// GST state code to state name.
pub fn state_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "01" => "Jammu & Kashmir",
        "02" => "Himachal Pradesh",
        "03" => "Punjab",
        "04" => "Chandigarh",
        "05" => "Uttarakhand",
        "06" => "Haryana",
        "07" => "Delhi",
        "08" => "Rajasthan",
        "09" => "Uttar Pradesh",
        "10" => "Bihar",
        "11" => "Sikkim",
        "12" => "Arunachal Pradesh",
        "13" => "Nagaland",
        "14" => "Manipur",
        "15" => "Mizoram",
        "16" => "Tripura",
        "17" => "Meghalaya",
        "18" => "Assam",
        "19" => "West Bengal",
        "20" => "Jharkhand",
        "21" => "Odisha",
        "22" => "Chhattisgarh",
        "23" => "Madhya Pradesh",
        "24" => "Gujarat",
        "26" => "Dadra & Nagar Haveli and Daman & Diu",
        "27" => "Maharashtra",
        "29" => "Karnataka",
        "30" => "Goa",
        "31" => "Lakshadweep",
        "32" => "Kerala",
        "33" => "Tamil Nadu",
        "34" => "Puducherry",
        "35" => "Andaman & Nicobar Islands",
        "36" => "Telangana",
        "37" => "Andhra Pradesh",
        "38" => "Ladakh",
        _ => return None,
    })
}
