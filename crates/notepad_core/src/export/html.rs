//! Standalone HTML document export.

use chrono::NaiveDate;

const DOCUMENT_STYLE: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 40px 20px;
            line-height: 1.6;
            color: #333;
        }
        h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; margin-bottom: 30px; }
        h2, h3, h4, h5, h6 { color: #34495e; margin-top: 30px; }
        img { max-width: 100%; height: auto; border-radius: 8px; margin: 20px 0; }
        table { border-collapse: collapse; width: 100%; margin: 20px 0; }
        th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
        th { background-color: #f8f9fa; font-weight: 600; color: #2c3e50; }
        code { background-color: #f8f9fa; padding: 4px 8px; border-radius: 4px; font-family: 'Monaco', 'Consolas', monospace; font-size: 0.9em; }
        pre { background-color: #2c3e50; color: #ecf0f1; padding: 20px; border-radius: 8px; overflow-x: auto; margin: 20px 0; }
        pre code { background: none; padding: 0; color: inherit; }
        blockquote { border-left: 4px solid #3498db; margin: 20px 0; padding-left: 20px; font-style: italic; color: #7f8c8d; }
        ul, ol { margin: 15px 0; padding-left: 30px; }
        li { margin: 5px 0; }
        a { color: #3498db; text-decoration: none; }
        mark { background-color: #f1c40f; padding: 2px 4px; border-radius: 3px; }
        .footer { margin-top: 50px; padding-top: 20px; border-top: 1px solid #eee; text-align: center; color: #7f8c8d; font-size: 0.9em; }"#;

/// Standalone styled HTML5 document embedding the raw note markup.
///
/// The title is escaped; the markup is embedded verbatim.
pub fn export_html(title: &str, markup: &str, exported_on: NaiveDate) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{DOCUMENT_STYLE}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="content">
        {markup}
    </div>
    <div class="footer">
        Exported from Notepad on {date}
    </div>
</body>
</html>
"#,
        date = exported_on.format("%B %-d, %Y"),
    )
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
