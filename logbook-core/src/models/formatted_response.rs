use serde::{Deserialize, Serialize};

/// Final response shape. The pipeline never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum FormattedResponse {
    Json(serde_json::Value),
    Markdown(String),
}

impl FormattedResponse {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Markdown(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Markdown(s) => Some(s),
            Self::Json(_) => None,
        }
    }
}
