use std::collections::BTreeMap;

/// Parse certificate input text of the form `Key: value`, one per line.
/// - keys are trimmed and lower-cased
/// - only the first colon splits, so values may contain colons
/// - lines without a colon are ignored
pub fn parse_input_text(s: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    for line in s.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }
    fields
}
