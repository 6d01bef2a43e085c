use serde_json::Value;

/// Normalized result of a successful request.
///
/// Failures are never an `Outcome`; they are reported as
/// [`ApiError`](super::ApiError) so an empty success cannot be mistaken for one.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server returned a JSON document (object or array), passed through verbatim.
    Json(Value),
    /// The operation succeeded and the server sent no content (HTTP 204).
    Empty,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    /// Borrows the JSON document, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Outcome::Json(value) => Some(value),
            Outcome::Empty => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Outcome::Json(value) => Some(value),
            Outcome::Empty => None,
        }
    }
}
