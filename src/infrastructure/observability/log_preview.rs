const MAX_VISIBLE_CHARS: usize = 100;

const SECRET_MARKERS: [(&str, &str); 5] = [
    ("Bearer ", "Bearer [REDACTED]"),
    ("api_key=", "api_key=[REDACTED]"),
    ("key=", "key=[REDACTED]"),
    ("x-goog-api-key: ", "x-goog-api-key: [REDACTED]"),
    ("token=", "token=[REDACTED]"),
];

/// Short, secret-free rendering of model or provider text for log lines.
pub fn log_preview(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{head}... ({total_chars} chars total)")
    } else {
        trimmed.to_string()
    };

    redact_secrets(&visible)
}

fn redact_secrets(text: &str) -> String {
    let mut result = text.to_string();

    for (marker, replacement) in SECRET_MARKERS {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].find(marker) {
            let idx = search_from + offset;
            let value_start = idx + marker.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\''))
                .map(|i| value_start + i)
                .unwrap_or(result.len());

            if result[value_start..value_end].starts_with("[REDACTED]") {
                search_from = value_end;
                continue;
            }

            result = format!("{}{}{}", &result[..idx], replacement, &result[value_end..]);
            search_from = idx + replacement.len();
        }
    }

    result
}
