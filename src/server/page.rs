//! Rendering of the visitor page.

use crate::capture::VisitorRecord;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Fills the page template with the captured record.
///
/// Every value is HTML-escaped; geo fields come from a third party and the
/// address may come from a client-controlled header. Substitution is a single
/// pass over the template, so placeholder text inside a value stays literal.
pub fn render_index(record: &VisitorRecord, cookie_name: &str) -> String {
    let os = record.os.to_string();
    let browser = record.browser.to_string();
    let device = record.device.to_string();
    let values: [(&str, &str); 8] = [
        ("ip", record.ip.as_str()),
        ("country", record.geo.country.as_str()),
        ("city", record.geo.city.as_str()),
        ("org", record.geo.org.as_str()),
        ("os", os.as_str()),
        ("browser", browser.as_str()),
        ("device", device.as_str()),
        ("cookie_name", cookie_name),
    ];

    let mut page = String::with_capacity(INDEX_TEMPLATE.len() + 256);
    let mut rest = INDEX_TEMPLATE;
    while let Some(start) = rest.find("{{") {
        page.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };

        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => page.push_str(&escape_html(value)),
            None => page.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    page.push_str(rest);
    page
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
