//! HTML report generator.
//!
//! Produces a self-contained HTML page with the CSS inlined.

use crate::report::Report;
use crate::text::timestamp;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render a report as a standalone HTML page.
///
/// The text body is split on its rule lines into one `<section>` per
/// session or award.
pub fn generate_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} report</title>\n",
        html_escape(&report.kind.to_string())
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} Report</h1>\n",
        html_escape(&report.kind.to_string())
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Report {} | Generated {}</p>\n",
        report.id,
        timestamp(report.generated_at)
    ));
    html.push_str("</header>\n");

    for block in report
        .content
        .split("-----------------------------------")
        .map(str::trim)
        .filter(|b| !b.is_empty())
    {
        html.push_str("<section>\n<pre>");
        html.push_str(&html_escape(block));
        html.push_str("</pre>\n</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 1rem; }
.meta { color: #6b7280; }
section { border: 1px solid var(--border); border-radius: 8px; margin: 1rem 0; padding: 0 1rem; }
pre { white-space: pre-wrap; font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.9rem; }
"#;
