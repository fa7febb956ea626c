//! HTML page rendering for the upload form

use std::collections::BTreeMap;

use crate::core::gps::Coordinate;
use crate::utils::constants::APP_VERSION;

const INDEX: &str = include_str!("index.html");

/// What the result area of the page shows
#[derive(Debug, Default)]
pub struct PageView {
    pub error: Option<String>,
    pub filename: Option<String>,
    pub coordinate: Option<Coordinate>,
    /// Set once EXIF was decoded, even when no coordinate came out of it
    pub exif: Option<BTreeMap<String, String>>,
}

impl PageView {
    /// Empty form
    pub fn form() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn result(
        filename: String,
        coordinate: Option<Coordinate>,
        exif: BTreeMap<String, String>,
    ) -> Self {
        Self {
            filename: Some(filename),
            coordinate,
            exif: Some(exif),
            ..Default::default()
        }
    }
}

/// Render the full page
pub fn render_page(view: &PageView) -> String {
    INDEX
        .replace("{{RESULT}}", &render_result(view))
        .replace("{{VERSION}}", APP_VERSION)
}

fn render_result(view: &PageView) -> String {
    let mut html = String::new();

    if let Some(error) = &view.error {
        html.push_str(&format!("  <p class=\"error\">{}</p>\n", escape_html(error)));
    }

    let exif = match &view.exif {
        Some(exif) => exif,
        None => return html,
    };

    if let Some(filename) = &view.filename {
        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(filename)));
    }

    match &view.coordinate {
        Some(coord) => {
            let link = escape_html(&coord.map_link());
            html.push_str(&format!(
                "  <div class=\"result\">\n    <p>Latitude: {:.6}<br>Longitude: {:.6}</p>\n    <p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">View on map</a></p>\n  </div>\n",
                coord.latitude, coord.longitude, link
            ));
        }
        None => {
            html.push_str("  <p class=\"notice\">No GPS data found in this photo.</p>\n");
        }
    }

    if exif.is_empty() {
        html.push_str("  <p>This photo carries no EXIF metadata.</p>\n");
    } else {
        let pretty = serde_json::to_string_pretty(exif).unwrap_or_default();
        html.push_str("  <details>\n    <summary>Raw EXIF data</summary>\n    <pre>");
        html.push_str(&escape_html(&pretty));
        html.push_str("</pre>\n  </details>\n");
    }

    html
}

/// Escape text for HTML body and attribute context
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_page() {
        let page = render_page(&PageView::form());
        assert!(page.contains("name=\"photo\""));
        assert!(page.contains(APP_VERSION));
        assert!(!page.contains("{{RESULT}}"));
        assert!(!page.contains("class=\"error\""));
    }

    #[test]
    fn test_error_is_escaped() {
        let page = render_page(&PageView::error("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_located_result() {
        let coord = Coordinate::new(40.446111, -79.982222).unwrap();
        let mut exif = BTreeMap::new();
        exif.insert("Make".to_string(), "TestCam".to_string());

        let page = render_page(&PageView::result("trip.jpg".to_string(), Some(coord), exif));
        assert!(page.contains("Latitude: 40.446111"));
        assert!(page.contains("Longitude: -79.982222"));
        assert!(page.contains("https://www.google.com/maps?q=40.446111,-79.982222"));
        assert!(page.contains("TestCam"));
    }

    #[test]
    fn test_no_gps_result() {
        let page = render_page(&PageView::result("plain.jpg".to_string(), None, BTreeMap::new()));
        assert!(page.contains("No GPS data found in this photo."));
        assert!(page.contains("no EXIF metadata"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b \"c\" 'd'"), "a&amp;b &quot;c&quot; &#39;d&#39;");
    }
}
