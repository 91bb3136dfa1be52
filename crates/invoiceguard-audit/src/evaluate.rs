//! Per-check classification rules.
//!
//! Every rule follows the same shape: propagate a collaborator's
//! data-missing condition first, then classify remaining conditions from
//! most severe to least, falling through to `pass`. Image-only checks
//! (1.2, 1.4, 3.1, 4.4) return `not_applicable` for non-image uploads.

use serde::Serialize;
use serde_json::Value;

use invoiceguard_types::{CheckDefinition, CheckResult, CheckStatus, RiskLevel};

use crate::context::CheckContext;

/// Evaluate one catalog definition against the gathered context.
pub fn evaluate(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    match defn.id {
        "1.1" => metadata_tampering(defn, ctx),
        "1.2" => error_level_analysis(defn, ctx),
        "1.3" => font_consistency(defn, ctx),
        "1.4" => document_quality(defn, ctx),
        "2.1" => gstin_validation(defn, ctx),
        "2.2" => pan_validation(defn, ctx),
        "2.3" => hsn_validation(defn, ctx),
        "2.4" => gst_calculation(defn, ctx),
        "2.5" => invoice_number(defn, ctx),
        "2.6" => bank_details(defn, ctx),
        "2.7" => einvoice(defn, ctx),
        "3.1" => template_consistency(defn, ctx),
        "3.2" => pricing_variance(defn, ctx),
        "3.3" => frequency_pattern(defn, ctx),
        "3.4" => address_consistency(defn, ctx),
        "3.5" => terms_variance(defn, ctx),
        "4.1" => exact_duplicate(defn, ctx),
        "4.2" => near_duplicate(defn, ctx),
        "4.3" => po_grn_match(defn, ctx),
        "4.4" => image_duplicate(defn, ctx),
        "4.5" => content_duplicate(defn, ctx),
        "5.1" => vendor_risk(defn, ctx),
        "5.2" => anomaly(defn, ctx),
        "5.3" => expense_correlation(defn, ctx),
        "5.4" => collusion(defn, ctx),
        "5.5" => threshold_circumvention(defn, ctx),
        _ => CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some("Data Missing: Check not yet implemented.".to_string()),
            Value::Null,
        ),
    }
}

fn json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn joined(alerts: &[String]) -> String {
    alerts.join("; ")
}

fn metadata_tampering(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let md = &ctx.metadata;
    if let Some(error) = &md.error {
        return CheckResult::new(defn, CheckStatus::Fail, Some(error.clone()), json(md));
    }
    if !md.suspicious_software.is_empty() {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Editing software detected: {}",
                md.suspicious_software.join(", ")
            )),
            json(md),
        );
    }
    if md.modify_after_create {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some("Metadata shows ModifyDate differs from CreationDate.".to_string()),
            json(md),
        );
    }
    if md.incremental_saves > 2 {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "PDF has {} incremental saves (indicates edits).",
                md.incremental_saves
            )),
            json(md),
        );
    }
    let creators = md
        .metadata
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if ["adobe", "photoshop", "gimp"].iter().any(|k| creators.contains(k)) {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some("Creator/Producer indicates editing tooling.".to_string()),
            json(md),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(md))
}

fn error_level_analysis(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let ela = &ctx.ela;
    if !ctx.is_image {
        return CheckResult::new(
            defn,
            CheckStatus::NotApplicable,
            Some("ELA is only applicable for image uploads.".to_string()),
            Value::Null,
        );
    }
    if let Some(error) = &ela.error {
        return CheckResult::new(defn, CheckStatus::Fail, Some(error.clone()), json(ela));
    }
    if !ela.possible {
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some("Data Missing: ELA backend not available.".to_string()),
            json(ela),
        );
    }
    if ela.flagged {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some("Potential manipulation detected by ELA variance.".to_string()),
            json(ela),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(ela))
}

fn font_consistency(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let fa = &ctx.font_analysis;
    if !fa.available {
        let reason = fa
            .reason
            .as_deref()
            .unwrap_or("Font analysis not available.");
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some(format!("Data Missing: {reason}")),
            json(fa),
        );
    }
    if !fa.consistent {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Font inconsistency: {} low-confidence words, std={}.",
                fa.low_confidence_words, fa.std_confidence
            )),
            json(fa),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(fa))
}

fn document_quality(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let q = &ctx.quality;
    if !ctx.is_image {
        return CheckResult::new(
            defn,
            CheckStatus::NotApplicable,
            Some("Quality check is only applicable for image uploads.".to_string()),
            Value::Null,
        );
    }
    let score = match q.score {
        Some(s) => s,
        None => {
            return CheckResult::new(
                defn,
                CheckStatus::DataMissing,
                Some("Data Missing: Quality scoring backend not available.".to_string()),
                json(q),
            );
        }
    };
    if q.moire_detected {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Document appears to be photographed from screen. Quality: {score}%"
            )),
            json(q),
        );
    }
    if score < 40 {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Low document quality ({score}%): {}",
                joined(&q.issues)
            )),
            json(q),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(q))
}

fn gstin_validation(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let gv = &ctx.gstin;
    if !gv.is_valid {
        if gv.data_missing {
            return CheckResult::new(
                defn,
                CheckStatus::DataMissing,
                Some(joined(&gv.alerts)),
                json(gv),
            );
        }
        let alert = if gv.alerts.is_empty() {
            "Invalid GSTIN.".to_string()
        } else {
            joined(&gv.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(gv));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(gv))
}

fn pan_validation(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let pv = &ctx.pan;
    if !pv.is_valid {
        if pv.data_missing {
            return CheckResult::new(
                defn,
                CheckStatus::DataMissing,
                Some(joined(&pv.alerts)),
                json(pv),
            );
        }
        let alert = if pv.alerts.is_empty() {
            "Invalid PAN.".to_string()
        } else {
            joined(&pv.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(pv));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(pv))
}

fn hsn_validation(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let hv = &ctx.hsn;
    if let Some(alert) = &hv.alert {
        let status = if hv.data_missing {
            CheckStatus::DataMissing
        } else {
            CheckStatus::Warning
        };
        return CheckResult::new(defn, status, Some(alert.clone()), json(hv));
    }
    if !hv.is_valid {
        return CheckResult::new(
            defn,
            CheckStatus::Fail,
            Some("HSN/SAC validation failed.".to_string()),
            json(hv),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(hv))
}

fn gst_calculation(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let gc = &ctx.gst_calc;
    if gc.data_missing {
        let alert = gc
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: GST amounts not extracted.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(gc));
    }
    if !gc.verified {
        let alert = if gc.alerts.is_empty() {
            "GST calculation error.".to_string()
        } else {
            joined(&gc.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(gc));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(gc))
}

fn invoice_number(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let iv = &ctx.invoice_number;
    if iv.data_missing {
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some(joined(&iv.alerts)),
            json(iv),
        );
    }
    if !iv.alerts.is_empty() {
        // Reuse of a historical number is a double-billing signal; format
        // drift is only a warning.
        let status = if iv.duplicate_in_history {
            CheckStatus::Fail
        } else {
            CheckStatus::Warning
        };
        return CheckResult::new(defn, status, Some(joined(&iv.alerts)), json(iv));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(iv))
}

fn bank_details(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let bv = &ctx.bank;
    if bv.data_missing {
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some(joined(&bv.alerts)),
            json(bv),
        );
    }
    if !bv.valid {
        let alert = if bv.alerts.is_empty() {
            "Invalid bank details.".to_string()
        } else {
            joined(&bv.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(bv));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(bv))
}

fn einvoice(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let ev = &ctx.einvoice;
    if ev.data_missing {
        let alert = ev
            .alert
            .clone()
            .unwrap_or_else(|| "Data Missing: IRN not extracted.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(ev));
    }
    if !ev.irn_present || !ev.irn_length_valid {
        let alert = ev
            .alert
            .clone()
            .unwrap_or_else(|| "IRN not found.".to_string());
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(ev));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(ev))
}

fn template_consistency(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let tc = &ctx.template;
    if !ctx.is_image {
        return CheckResult::new(
            defn,
            CheckStatus::NotApplicable,
            Some("Template check is only applicable for image uploads.".to_string()),
            Value::Null,
        );
    }
    if !tc.available {
        let reason = tc.reason.as_deref().unwrap_or("Template check not available.");
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some(format!("Data Missing: {reason}")),
            json(tc),
        );
    }
    if tc.is_baseline {
        return CheckResult::new(
            defn,
            CheckStatus::Pass,
            Some("First invoice - baseline established.".to_string()),
            json(tc),
        );
    }
    if !tc.alerts.is_empty() {
        return CheckResult::new(defn, CheckStatus::Warning, Some(joined(&tc.alerts)), json(tc));
    }
    if !tc.template_match {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!("Template match score: {}%", tc.match_score)),
            json(tc),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(tc))
}

fn pricing_variance(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let pc = &ctx.pricing;
    if pc.items_checked == 0 {
        let alert = pc
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No pricing data.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(pc));
    }
    if pc.variance_detected {
        let alert = if pc.alerts.is_empty() {
            "Price variance detected.".to_string()
        } else {
            joined(&pc.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(pc));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(pc))
}

fn frequency_pattern(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let fc = &ctx.frequency;
    if fc.invoice_count < 3 {
        let alert = fc
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: Insufficient history.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(fc));
    }
    if !fc.pattern_normal {
        let alert = if fc.alerts.is_empty() {
            "Abnormal pattern.".to_string()
        } else {
            joined(&fc.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(fc));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(fc))
}

fn address_consistency(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let ac = &ctx.address;
    if ac.data_missing {
        let alert = ac
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No address extracted.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(ac));
    }
    if !ac.consistent {
        let alert = if ac.alerts.is_empty() {
            "Address inconsistency.".to_string()
        } else {
            joined(&ac.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(ac));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(ac))
}

fn terms_variance(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let tc = &ctx.terms;
    if tc.data_missing {
        let alert = tc
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No terms data extracted.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(tc));
    }
    if tc.variance_detected {
        let alert = if tc.alerts.is_empty() {
            "T&C variance.".to_string()
        } else {
            joined(&tc.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(tc));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(tc))
}

fn exact_duplicate(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let ed = &ctx.exact_dup;
    if ed.data_missing {
        let alert = ed
            .alert
            .clone()
            .unwrap_or_else(|| "Data Missing: No invoice number for duplicate check.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(ed));
    }
    if ed.is_duplicate {
        let alert = ed
            .alert
            .clone()
            .unwrap_or_else(|| "Exact duplicate detected.".to_string());
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(ed));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(ed))
}

fn near_duplicate(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let nd = &ctx.near_dup;
    if nd.data_missing || !nd.available {
        let alert = nd
            .alert
            .clone()
            .unwrap_or_else(|| "Data Missing: Fuzzy matching not available.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(nd));
    }
    if nd.is_duplicate {
        let alert = nd
            .alert
            .clone()
            .unwrap_or_else(|| "Near-duplicate detected.".to_string());
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(nd));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(nd))
}

fn po_grn_match(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let pg = &ctx.po_grn;
    if pg.data_missing {
        let alert = pg
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No PO/GRN data.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(pg));
    }
    if !pg.matched {
        let alert = if pg.alerts.is_empty() {
            "3-way match failed.".to_string()
        } else {
            joined(&pg.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(pg));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(pg))
}

fn image_duplicate(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let id = &ctx.image_dup;
    if !ctx.is_image {
        return CheckResult::new(
            defn,
            CheckStatus::NotApplicable,
            Some("Image hashing is only applicable for image uploads.".to_string()),
            Value::Null,
        );
    }
    if !id.available {
        let alert = id
            .reason
            .clone()
            .unwrap_or_else(|| "Image hashing not applicable.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(id));
    }
    if id.is_duplicate {
        let alert = id
            .alert
            .clone()
            .unwrap_or_else(|| "Image duplicate detected.".to_string());
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(id));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(id))
}

fn content_duplicate(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let cd = &ctx.content_dup;
    if !cd.available {
        let reason = cd
            .reason
            .as_deref()
            .unwrap_or("OCR content comparison not available.");
        return CheckResult::new(
            defn,
            CheckStatus::DataMissing,
            Some(format!("Data Missing: {reason}")),
            json(cd),
        );
    }
    if cd.is_duplicate {
        let alert = cd
            .alert
            .clone()
            .unwrap_or_else(|| "Content duplicate detected.".to_string());
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(cd));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(cd))
}

fn vendor_risk(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let vr = &ctx.vendor_risk;
    let level = vr.risk_level;
    let score = vr.risk_score;
    match level {
        RiskLevel::Critical => CheckResult::new(
            defn,
            CheckStatus::Fail,
            Some(format!(
                "Vendor risk: {} ({score}/100). {}",
                level.as_str(),
                vr.recommended_action
            )),
            json(vr),
        ),
        RiskLevel::High => CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Vendor risk: {} ({score}/100). {}",
                level.as_str(),
                vr.recommended_action
            )),
            json(vr),
        ),
        RiskLevel::Medium => CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!("Vendor risk: {} ({score}/100).", level.as_str())),
            json(vr),
        ),
        RiskLevel::Low => CheckResult::new(defn, CheckStatus::Pass, None, json(vr)),
    }
}

fn anomaly(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let an = &ctx.anomaly;
    if an.is_anomaly {
        return CheckResult::new(
            defn,
            CheckStatus::Warning,
            Some(format!(
                "Statistical anomaly detected: {}",
                an.anomaly_factors.join(", ")
            )),
            json(an),
        );
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(an))
}

fn expense_correlation(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let ec = &ctx.expense;
    if ec.data_missing {
        let alert = ec
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No activity data.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(ec));
    }
    if !ec.correlated {
        let alert = if ec.alerts.is_empty() {
            "Weak expense correlation.".to_string()
        } else {
            joined(&ec.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(ec));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(ec))
}

fn collusion(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let co = &ctx.collusion;
    if co.data_missing {
        let alert = co
            .reason
            .clone()
            .unwrap_or_else(|| "Data Missing: No vendor master data.".to_string());
        return CheckResult::new(defn, CheckStatus::DataMissing, Some(alert), json(co));
    }
    if co.collusion_detected {
        let alert = if co.alerts.is_empty() {
            "Collusion indicators found.".to_string()
        } else {
            joined(&co.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Fail, Some(alert), json(co));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(co))
}

fn threshold_circumvention(defn: &CheckDefinition, ctx: &CheckContext) -> CheckResult {
    let th = &ctx.threshold;
    if th.split_detected || !th.threshold_proximity.is_empty() {
        let alert = if th.alerts.is_empty() {
            "Threshold circumvention pattern.".to_string()
        } else {
            joined(&th.alerts)
        };
        return CheckResult::new(defn, CheckStatus::Warning, Some(alert), json(th));
    }
    CheckResult::new(defn, CheckStatus::Pass, None, json(th))
}
