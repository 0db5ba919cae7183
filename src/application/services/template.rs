use std::collections::HashMap;

/// Replaces each `{key}` with its value from `variables`.
///
/// Keys are ASCII alphanumerics or `_`, matched case-sensitively. Unknown keys
/// resolve to an empty string. Braces that do not enclose a valid key are kept
/// as written, and substituted values are never scanned again.
pub fn resolve_template(template: &str, variables: &HashMap<&str, &str>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' && is_key(&after[..close]) => {
                let key = &after[..close];
                output.push_str(variables.get(key).copied().unwrap_or_default());
                rest = &after[close + 1..];
            }
            _ => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

fn is_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
