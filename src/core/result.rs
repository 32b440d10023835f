//! Outcome of a single action run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of running an action.
///
/// On success, `data` (when present) is merged into the state by
/// `execute`. On failure the state is left untouched and `error` carries
/// the reason.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionResult {
    Success {
        message: Option<String>,
        data: Option<Map<String, Value>>,
    },
    Failure {
        message: Option<String>,
        error: String,
    },
}

impl ActionResult {
    /// A success carrying no data.
    pub fn success() -> Self {
        Self::Success {
            message: None,
            data: None,
        }
    }

    /// A failure with the given error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            message: None,
            error: error.into(),
        }
    }

    /// A success whose data is the serialized form of `output`.
    ///
    /// `output` must serialize to an object.
    pub fn from_output<T: Serialize>(output: &T) -> anyhow::Result<Self> {
        match serde_json::to_value(output)? {
            Value::Object(data) => Ok(Self::Success {
                message: None,
                data: Some(data),
            }),
            other => anyhow::bail!("action output must serialize to an object, got {other}"),
        }
    }

    /// Attach data to a success. Failures are returned unchanged.
    pub fn with_data<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        match self {
            Self::Success { message, data } => {
                let mut data = data.unwrap_or_default();
                for (k, v) in values {
                    data.insert(k.into(), v.into());
                }
                Self::Success {
                    message,
                    data: Some(data),
                }
            }
            failure => failure,
        }
    }

    pub fn with_message(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            Self::Success { data, .. } => Self::Success {
                message: text,
                data,
            },
            Self::Failure { error, .. } => Self::Failure {
                message: text,
                error,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } | Self::Failure { message, .. } => message.as_deref(),
        }
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success { data, .. } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error.as_str()),
        }
    }
}
