use url::form_urlencoded::byte_serialize;

/// Percent-encodes `raw` so it stays a single path segment.
///
/// Returns `None` for values a URL parser would resolve to another path
/// (empty, `.` and `..`).
pub fn path_segment(raw: &str) -> Option<String> {
    if matches!(raw, "" | "." | "..") {
        return None;
    }
    // Form encoding writes spaces as `+`; a literal `+` is already `%2B`.
    let encoded: String = byte_serialize(raw.as_bytes()).collect();
    Some(encoded.replace('+', "%20"))
}
