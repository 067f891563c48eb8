//! Low-level text writers shared by the JSON and XML serializers

use serde_json::Value;

/// Append `s` as a quoted, escaped JSON string literal
pub(crate) fn push_json_string(out: &mut String, s: &str) {
    out.push_str(&Value::from(s).to_string());
}

/// Append `items` as a JSON array of string literals
pub(crate) fn push_json_string_array<'a>(out: &mut String, items: impl IntoIterator<Item = &'a str>) {
    out.push('[');
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_json_string(out, item);
    }
    out.push(']');
}

/// Escape `s` for use inside an already-quoted JSON string
pub(crate) fn escape_json_text(s: &str) -> String {
    let quoted = Value::from(s).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Append `s` with XML markup characters replaced by entities
pub(crate) fn push_xml_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// Append `<tag>text</tag>` with the text escaped
pub(crate) fn push_xml_element(out: &mut String, tag: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    push_xml_text(out, text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
