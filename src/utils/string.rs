//! String manipulation utilities

/// Pluralize a word based on count
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Join items with `", "`, or return `"(none)"` when there are none
pub fn join_or_none<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

/// Escape text for use in XML attributes and character data
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&apos;");
        assert_eq!(xml_escape(":app:sub"), ":app:sub");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("project", 0), "projects");
        assert_eq!(pluralize("project", 1), "project");
        assert_eq!(pluralize("project", 5), "projects");
    }

    #[test]
    fn test_join_or_none() {
        assert_eq!(join_or_none([":a", ":b"]), ":a, :b");
        assert_eq!(join_or_none(Vec::<String>::new()), "(none)");
    }
}
