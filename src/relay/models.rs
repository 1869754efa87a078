use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/chat`.
///
/// `question` is deliberately untyped: whatever arrives is relayed.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Value,
}

impl ChatRequest {
    /// Parse a raw request body. An empty body is an empty question.
    pub fn from_body(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    /// The question as upstream text: strings verbatim, absent or null as
    /// empty, anything else as its JSON text.
    pub fn question_text(&self) -> String {
        match &self.question {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_question_passes_verbatim() {
        let req = ChatRequest::from_body(br#"{"question":"  What is 2+2?  "}"#).unwrap();
        assert_eq!(req.question_text(), "  What is 2+2?  ");
    }

    #[test]
    fn missing_question_is_empty() {
        let req = ChatRequest::from_body(br#"{"other":1}"#).unwrap();
        assert_eq!(req.question_text(), "");
    }

    #[test]
    fn null_question_is_empty() {
        let req = ChatRequest::from_body(br#"{"question":null}"#).unwrap();
        assert_eq!(req.question_text(), "");
    }

    #[test]
    fn non_string_question_is_json_text() {
        let req = ChatRequest::from_body(br#"{"question":42}"#).unwrap();
        assert_eq!(req.question_text(), "42");

        let req = ChatRequest::from_body(br#"{"question":["a",true]}"#).unwrap();
        assert_eq!(req.question_text(), r#"["a",true]"#);
    }

    #[test]
    fn empty_body_is_empty_question() {
        assert_eq!(ChatRequest::from_body(b"").unwrap().question_text(), "");
        assert_eq!(ChatRequest::from_body(b" \n").unwrap().question_text(), "");
    }

    #[test]
    fn garbage_body_fails() {
        assert!(ChatRequest::from_body(b"question=hi").is_err());
    }

    #[test]
    fn responses_serialize_to_single_field() {
        let body = serde_json::to_string(&ChatResponse {
            answer: "4".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"answer":"4"}"#);

        let body = serde_json::to_string(&ErrorResponse {
            error: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"error":"nope"}"#);
    }
}
