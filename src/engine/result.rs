// ABOUTME: Result records produced per top-level field and the run outcome
// ABOUTME: Success is all-or-nothing: any diagnostic forces the error outcome

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::parser::ValidationError;

/// Key carrying the field name inside a serialized record.
pub const TYPE_KEY: &str = "_type";

/// Key wrapping a non-mapping field value.
pub const VALUE_KEY: &str = "value";

/// One rendered top-level field. Serializes as `{"_type": <field>, ...payload}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub record_type: String,
    pub payload: Map<String, JsonValue>,
}

impl ResultRecord {
    /// A mapping becomes the payload as-is; anything else is wrapped under `value`.
    pub fn new(record_type: impl Into<String>, value: JsonValue) -> Self {
        let payload = match value {
            JsonValue::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert(VALUE_KEY.to_string(), other);
                map
            }
        };

        Self {
            record_type: record_type.into(),
            payload,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.payload.get(key)
    }

    /// `_type` first, then the payload merged over it. A payload `_type` keeps
    /// the leading position but its value wins.
    pub fn to_map(&self) -> Map<String, JsonValue> {
        let mut map = Map::new();
        map.insert(
            TYPE_KEY.to_string(),
            JsonValue::String(self.record_type.clone()),
        );
        map.extend(self.payload.clone());
        map
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Ok,
    Error,
}

/// Outcome of one run. Serializes as `{"status": "ok", "data": [...]}` or
/// `{"status": "error", "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Ok { data: Vec<ResultRecord> },
    Error { errors: Vec<ValidationError> },
}

impl RunOutcome {
    /// Derive the outcome once, at the end of a run.
    pub fn from_parts(results: Vec<ResultRecord>, errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            RunOutcome::Ok { data: results }
        } else {
            RunOutcome::Error { errors }
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Ok { .. } => RunStatus::Ok,
            RunOutcome::Error { .. } => RunStatus::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status() == RunStatus::Ok
    }

    pub fn records(&self) -> &[ResultRecord] {
        match self {
            RunOutcome::Ok { data } => data,
            RunOutcome::Error { .. } => &[],
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            RunOutcome::Ok { .. } => &[],
            RunOutcome::Error { errors } => errors,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Ok => write!(f, "ok"),
            RunStatus::Error => write!(f, "error"),
        }
    }
}
