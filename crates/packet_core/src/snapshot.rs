//! Self-contained HTML snapshot of a job posting.
//!
//! Every plain-text field is escaped. The description is embedded verbatim:
//! it arrives already sanitized by the page scraper.

use std::fmt::Write;

use url::Url;

use crate::folder_name::sanitize_folder_name;
use crate::JobPacket;

/// File written into a job folder when the caller names none.
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "ad.html";

const STYLE: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }
        .header { border-bottom: 2px solid #333; padding-bottom: 10px; margin-bottom: 20px; }
        .title { font-size: 24px; font-weight: bold; color: #333; }
        .company { font-size: 18px; color: #666; margin: 5px 0; }
        .metadata { background: #f5f5f5; padding: 10px; margin: 20px 0; border-left: 4px solid #0073b1; }
        .metadata-item { margin: 5px 0; }
        .content { margin: 20px 0; }
        .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #ccc; font-size: 12px; color: #666; }";

/// Final snapshot file name plus a note for the caller when it differs
/// from what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotName {
    pub file_name: String,
    pub warning: Option<String>,
}

/// Resolves the requested (legacy "pdf") file name to the `.html` file
/// actually written.
pub fn snapshot_file_name(requested: Option<&str>) -> SnapshotName {
    let Some(requested) = requested.map(str::trim).filter(|r| !r.is_empty()) else {
        return SnapshotName {
            file_name: DEFAULT_SNAPSHOT_FILENAME.to_string(),
            warning: None,
        };
    };

    let base = requested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(requested);
    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.trim().is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };
    let file_name = format!("{}.html", sanitize_folder_name(stem));

    let is_html = extension.is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    let warning = (!is_html || file_name != base).then(|| {
        format!("Requested '{requested}' was saved as HTML '{file_name}'; PDF output is not produced")
    });

    SnapshotName { file_name, warning }
}

/// Escapes `& < > " '` for use in element text and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the snapshot document. `generated_at` is shown in the footer.
pub fn render_snapshot(packet: &JobPacket, generated_at: &str) -> String {
    let title = escape_html(&packet.title);
    let company = escape_html(&packet.company);

    let mut header = String::new();
    if let Some(location) = &packet.location {
        let _ = write!(header, "\n        <div>{}</div>", escape_html(location));
    }
    if let Some(pay) = &packet.pay {
        let _ = write!(
            header,
            "\n        <div><strong>Pay:</strong> {}</div>",
            escape_html(pay)
        );
    }

    let mut metadata = String::new();
    let _ = write!(
        metadata,
        "\n        <div class='metadata-item'><strong>Captured:</strong> {}</div>",
        escape_html(&packet.captured_at_iso)
    );
    let _ = write!(
        metadata,
        "\n        <div class='metadata-item'><strong>Source:</strong> {}</div>",
        source_link(&packet.source_url)
    );
    if let Some(posted) = &packet.posted_age {
        let _ = write!(
            metadata,
            "\n        <div class='metadata-item'><strong>Posted:</strong> {}</div>",
            escape_html(posted)
        );
    }
    if let Some(applicants) = &packet.applicants {
        let _ = write!(
            metadata,
            "\n        <div class='metadata-item'><strong>Applicants:</strong> {}</div>",
            escape_html(applicants)
        );
    }

    format!(
        "<!DOCTYPE html>
<html>
<head>
    <meta charset='utf-8'>
    <title>Job Application - {title}</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class='header'>
        <div class='title'>{title}</div>
        <div class='company'>{company}</div>{header}
    </div>

    <div class='metadata'>{metadata}
    </div>

    <div class='content'>
        <h2>Job Description</h2>
        {description}
    </div>

    <div class='footer'>
        Generated by Job Packet Host on {generated}
    </div>
</body>
</html>
",
        description = packet.description_html,
        generated = escape_html(generated_at),
    )
}

fn source_link(source_url: &str) -> String {
    let escaped = escape_html(source_url);
    match Url::parse(source_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            format!("<a href='{escaped}'>{escaped}</a>")
        }
        _ => escaped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn missing_name_uses_default() {
        let name = snapshot_file_name(None);
        assert_eq!(name.file_name, DEFAULT_SNAPSHOT_FILENAME);
        assert_eq!(name.warning, None);
        assert_eq!(snapshot_file_name(Some("  ")).file_name, DEFAULT_SNAPSHOT_FILENAME);
    }

    #[test]
    fn pdf_name_becomes_html_with_warning() {
        let name = snapshot_file_name(Some("posting.pdf"));
        assert_eq!(name.file_name, "posting.html");
        assert!(name.warning.unwrap().contains("posting.html"));
    }

    #[test]
    fn html_extension_is_normalized() {
        let name = snapshot_file_name(Some("posting.HTML"));
        assert_eq!(name.file_name, "posting.html");
        assert!(name.warning.is_some());

        let name = snapshot_file_name(Some("posting.html"));
        assert_eq!(name.file_name, "posting.html");
        assert_eq!(name.warning, None);
    }

    #[test]
    fn directory_components_are_dropped() {
        let name = snapshot_file_name(Some(r"..\..\evil/ad.pdf"));
        assert_eq!(name.file_name, "ad.html");
    }

    #[test]
    fn non_http_source_is_not_linked() {
        assert_eq!(source_link("javascript:alert(1)"), "javascript:alert(1)");
        assert!(source_link("https://example.com/jobs/1").starts_with("<a href="));
    }
}
