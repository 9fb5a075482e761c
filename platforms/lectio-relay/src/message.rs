//! The Telegram message built from a submitted result.

use serde::Deserialize;
use serde_json::Value;

/// Request body of `POST /api/submit`. Every field is optional and of any
/// JSON type; the page is not trusted to send a well-formed payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub name: Value,
    pub surname: Value,
    pub group: Value,
    pub book: Value,
    pub unit: Value,
    pub score: Value,
    pub answers: Value,
}

impl Submission {
    /// Bodies that are not a JSON object are treated as empty. Arrays would
    /// otherwise fill the fields by position.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) if value.is_object() => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn or_na(value: &Value) -> String {
    if is_blank(value) {
        "N/A".to_string()
    } else {
        text(value)
    }
}

pub fn format_message(submission: &Submission) -> String {
    let mut message = format!(
        "📚 New ELS result\n👤 {} {}\n👥 Group: {}\n📖 Book: {}\n🧩 Unit: {}\n✅ Score: {}\n\n",
        text(&submission.name),
        text(&submission.surname),
        text(&submission.group),
        or_na(&submission.book),
        or_na(&submission.unit),
        or_na(&submission.score),
    );
    if !is_blank(&submission.answers) {
        let answers = serde_json::to_string_pretty(&submission.answers).unwrap_or_default();
        message.push_str("Answers:\n");
        message.push_str(&answers);
    }
    message
}
