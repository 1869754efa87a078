use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::consts::{DEFAULT_API_BASE, DEFAULT_MODEL};

use super::{DecodeError, Rejection, Reply, Upstream};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// How much of an unparseable body makes it into an error message.
const BODY_PREVIEW_CHARS: usize = 200;

/// Where and how to reach the Generative Language API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

// Never print the key.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Relays a question to Gemini's `generateContent` as a single user turn.
pub struct GeminiUpstream {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiUpstream {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        let model = self
            .config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model);
        format!("{base}/v1beta/models/{model}:generateContent")
    }
}

#[async_trait]
impl Upstream for GeminiUpstream {
    async fn ask(&self, question: &str) -> Result<Reply> {
        let body = GenerateRequest::single_turn(question);

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.header(API_KEY_HEADER, key);
        }

        let resp = req.send().await.context("failed to reach Gemini")?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("failed to read Gemini response body")?;

        let value: Value = serde_json::from_str(&text).with_context(|| {
            format!("Gemini returned a non-JSON body ({status}): {}", preview(&text))
        })?;
        log::debug!("Gemini raw response ({status}): {value:#}");

        log_usage(&value);
        Ok(decode_reply(&value))
    }
}

/// Classify a parsed `generateContent` response.
///
/// A top-level `error` object wins over everything else. Otherwise the answer
/// is read from `candidates[0].content.parts[0].text`.
pub fn decode_reply(body: &Value) -> Reply {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Reply::Rejected(decode_rejection(error));
    }

    match extract_answer(body) {
        Ok(answer) => Reply::Answer(answer),
        Err(reason) => {
            match &reason {
                DecodeError::Malformed { .. } => log::warn!("malformed Gemini reply: {reason}"),
                _ => log::warn!("Gemini reply has no answer: {reason}"),
            }
            Reply::NoAnswer(reason)
        }
    }
}

fn decode_rejection(error: &Value) -> Rejection {
    let Some(obj) = error.as_object() else {
        return Rejection {
            code: None,
            status: None,
            message: match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        };
    };

    Rejection {
        code: obj.get("code").and_then(Value::as_i64),
        status: obj.get("status").and_then(Value::as_str).map(str::to_string),
        message: obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string(),
    }
}

fn extract_answer(body: &Value) -> Result<String, DecodeError> {
    let root = as_object(body, "$")?;
    let candidates = field(root, "candidates", "candidates")?;
    let candidate = first_item(candidates, "candidates")?;
    let content = field(
        as_object(candidate, "candidates[0]")?,
        "content",
        "candidates[0].content",
    )?;
    let parts = field(
        as_object(content, "candidates[0].content")?,
        "parts",
        "candidates[0].content.parts",
    )?;
    let part = first_item(parts, "candidates[0].content.parts")?;

    let path = "candidates[0].content.parts[0].text";
    match field(as_object(part, "candidates[0].content.parts[0]")?, "text", path)? {
        Value::String(text) if text.is_empty() => Err(DecodeError::Empty {
            path: path.to_string(),
        }),
        Value::String(text) => Ok(text.clone()),
        other => Err(malformed(path, "a string", other)),
    }
}

/// Missing keys and explicit nulls both count as absent.
fn field<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value, DecodeError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(DecodeError::Absent {
            path: path.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| malformed(path, "an object", value))
}

fn first_item<'a>(value: &'a Value, path: &str) -> Result<&'a Value, DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed(path, "an array", value))?;
    items.first().ok_or_else(|| DecodeError::Absent {
        path: format!("{path}[0]"),
    })
}

fn malformed(path: &str, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::Malformed {
        path: path.to_string(),
        expected,
        found: kind(found),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn log_usage(body: &Value) {
    let Some(usage) = body.get("usageMetadata") else {
        return;
    };
    let prompt = usage.get("promptTokenCount").and_then(Value::as_u64);
    let output = usage.get("candidatesTokenCount").and_then(Value::as_u64);
    if let (Some(prompt), Some(output)) = (prompt, output) {
        log::debug!("[tokens] prompt: {prompt}, output: {output}");
    }
}

// --- API types ---

/// The first [`BODY_PREVIEW_CHARS`] characters of `text`, marked when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}… ({} bytes)", &text[..end], text.len()),
        None => text.to_string(),
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

impl<'a> GenerateRequest<'a> {
    fn single_turn(question: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text: question }],
            }],
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}
