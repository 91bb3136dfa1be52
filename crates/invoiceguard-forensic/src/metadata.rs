//! Metadata extraction from raw document bytes.
//!
//! PDFs are scanned for Info-dictionary string entries, incremental save
//! markers and header validity without a full PDF parser. Images are
//! validated by magic bytes only.

use std::collections::BTreeMap;

use tracing::debug;

use invoiceguard_types::MetadataReport;

/// Software names in metadata that indicate post-generation editing.
const EDITING_SOFTWARE_KEYWORDS: &[&str] =
    &["photoshop", "canva", "illustrator", "gimp", "coreldraw"];

/// Info-dictionary keys worth surfacing.
const INFO_KEYS: &[&str] = &[
    "/Title",
    "/Author",
    "/Subject",
    "/Creator",
    "/Producer",
    "/CreationDate",
    "/ModDate",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

/// File extension says this upload is an image rather than a PDF.
pub fn is_image_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Extracts a [`MetadataReport`] from document bytes.
pub trait MetadataInspector: Send + Sync {
    fn inspect(&self, file_name: &str, bytes: &[u8]) -> MetadataReport;
}

/// Built-in inspector working directly on the byte stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteInspector;

impl MetadataInspector for ByteInspector {
    fn inspect(&self, file_name: &str, bytes: &[u8]) -> MetadataReport {
        if is_image_file(file_name) {
            inspect_image(bytes)
        } else {
            inspect_pdf(bytes)
        }
    }
}

fn inspect_pdf(bytes: &[u8]) -> MetadataReport {
    if !bytes.starts_with(b"%PDF-") {
        return MetadataReport {
            file_type: "pdf".to_string(),
            error: Some("Corrupt or unreadable PDF: missing %PDF header.".to_string()),
            ..MetadataReport::default()
        };
    }

    let mut metadata = BTreeMap::new();
    for key in INFO_KEYS {
        if let Some(value) = last_info_string(bytes, key.as_bytes()) {
            metadata.insert((*key).to_string(), value);
        }
    }

    let suspicious_software = detect_editing_software(&metadata);
    let incremental_saves = count_occurrences(bytes, b"%%EOF") as u32;
    let modify_after_create = check_modify_after_create(&metadata);
    let page_count = count_pages(bytes);

    debug!(
        keys = metadata.len(),
        incremental_saves, modify_after_create, "PDF metadata inspected"
    );

    MetadataReport {
        file_type: "pdf".to_string(),
        metadata,
        suspicious_software,
        incremental_saves,
        modify_after_create,
        page_count: Some(page_count),
        error: None,
    }
}

fn inspect_image(bytes: &[u8]) -> MetadataReport {
    let format = image_format(bytes);
    let mut report = MetadataReport {
        file_type: "image".to_string(),
        ..MetadataReport::default()
    };
    match format {
        Some(name) => {
            report
                .metadata
                .insert("Format".to_string(), name.to_string());
        }
        None => {
            report.error =
                Some("Corrupt or unreadable image: unrecognized format.".to_string());
        }
    }
    report
}

fn image_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("JPEG")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("PNG")
    } else if bytes.starts_with(b"BM") {
        Some("BMP")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("WEBP")
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        Some("TIFF")
    } else {
        None
    }
}

/// Last occurrence wins: incremental updates append a new Info dictionary
/// that supersedes earlier ones.
fn last_info_string(bytes: &[u8], key: &[u8]) -> Option<String> {
    let mut result = None;
    let mut from = 0;
    while let Some(pos) = find(bytes, key, from) {
        from = pos + key.len();
        if let Some(value) = literal_string_after(bytes, from) {
            result = Some(value);
        }
    }
    result
}

/// Parse a PDF literal string `(...)` starting at or after `from`,
/// honoring backslash escapes and balanced parentheses.
fn literal_string_after(bytes: &[u8], from: usize) -> Option<String> {
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'(' {
        return None;
    }
    i += 1;

    let mut out = Vec::new();
    let mut depth = 1u32;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                out.push(bytes[i + 1]);
                i += 2;
                continue;
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(String::from_utf8_lossy(&out).into_owned());
                }
                out.push(b')');
            }
            other => out.push(other),
        }
        i += 1;
    }
    None
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = find(haystack, needle, from) {
        count += 1;
        from = pos + needle.len();
    }
    count
}

/// Count `/Type /Page` object markers, excluding the `/Pages` tree nodes.
fn count_pages(bytes: &[u8]) -> u32 {
    let mut count = 0usize;
    let mut from = 0;
    while let Some(pos) = find(bytes, b"/Type", from) {
        let mut i = pos + b"/Type".len();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes[i..].starts_with(b"/Page") && !bytes[i + b"/Page".len()..].starts_with(b"s") {
            count += 1;
        }
        from = pos + b"/Type".len();
    }
    count as u32
}

fn detect_editing_software(metadata: &BTreeMap<String, String>) -> Vec<String> {
    let joined = metadata
        .values()
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let mut hits: Vec<String> = EDITING_SOFTWARE_KEYWORDS
        .iter()
        .filter(|k| joined.contains(**k))
        .map(|k| (*k).to_string())
        .collect();
    hits.sort();
    hits
}

fn check_modify_after_create(metadata: &BTreeMap<String, String>) -> bool {
    let create = metadata
        .iter()
        .find(|(k, _)| k.to_lowercase().contains("creation"))
        .map(|(_, v)| v);
    let modify = metadata
        .iter()
        .find(|(k, _)| {
            let k = k.to_lowercase();
            k.contains("modify") || k.contains("moddate")
        })
        .map(|(_, v)| v);
    matches!((create, modify), (Some(c), Some(m)) if !c.is_empty() && !m.is_empty() && c != m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(body: &str) -> Vec<u8> {
        format!("%PDF-1.4\n{body}\n%%EOF\n").into_bytes()
    }

    #[test]
    fn image_extension_detection() {
        assert!(is_image_file("scan.JPG"));
        assert!(is_image_file("invoice.png"));
        assert!(!is_image_file("invoice.pdf"));
        assert!(!is_image_file("noextension"));
    }

    #[test]
    fn missing_pdf_header_is_an_error() {
        let r = ByteInspector.inspect("invoice.pdf", b"not a pdf");
        assert!(r.error.is_some());
        assert_eq!(r.file_type, "pdf");
    }

    #[test]
    fn info_strings_are_extracted() {
        let bytes = pdf("/Producer (LibreOffice 7.4) /Creator (Writer)");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.metadata["/Producer"], "LibreOffice 7.4");
        assert_eq!(r.metadata["/Creator"], "Writer");
        assert!(r.suspicious_software.is_empty());
        assert!(r.error.is_none());
    }

    #[test]
    fn editing_software_detected_case_insensitively() {
        let bytes = pdf("/Producer (Adobe Photoshop 24.0)");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.suspicious_software, vec!["photoshop".to_string()]);
    }

    #[test]
    fn incremental_saves_counted() {
        let mut bytes = pdf("/Producer (x)");
        bytes.extend_from_slice(b"more objects\n%%EOF\n");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.incremental_saves, 2);
    }

    #[test]
    fn modify_after_create_when_dates_differ() {
        let bytes =
            pdf("/CreationDate (D:20240101120000) /ModDate (D:20240315170000)");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert!(r.modify_after_create);

        let same = pdf("/CreationDate (D:20240101120000) /ModDate (D:20240101120000)");
        let r = ByteInspector.inspect("invoice.pdf", &same);
        assert!(!r.modify_after_create);
    }

    #[test]
    fn last_info_dictionary_wins() {
        let bytes = pdf("/Producer (Original) trailer /Producer (Edited Later)");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.metadata["/Producer"], "Edited Later");
    }

    #[test]
    fn escaped_parentheses_in_strings() {
        let bytes = pdf(r"/Title (Invoice \(final\))");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.metadata["/Title"], "Invoice (final)");
    }

    #[test]
    fn page_markers_counted_excluding_pages_tree() {
        let bytes = pdf("/Type /Pages /Type /Page /Type /Page");
        let r = ByteInspector.inspect("invoice.pdf", &bytes);
        assert_eq!(r.page_count, Some(2));
    }

    #[test]
    fn recognized_image_magic_is_not_an_error() {
        let r = ByteInspector.inspect("scan.png", b"\x89PNG\r\n\x1a\nrest");
        assert!(r.error.is_none());
        assert_eq!(r.file_type, "image");
        assert_eq!(r.metadata["Format"], "PNG");
    }

    #[test]
    fn unknown_image_bytes_are_an_error() {
        let r = ByteInspector.inspect("scan.png", b"garbage");
        assert!(r.error.is_some());
    }
}
