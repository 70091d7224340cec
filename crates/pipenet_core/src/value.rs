use serde::{Deserialize, Serialize};

use crate::{PipenetError, PipenetResult, Timestamp};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Int,
    Float,
    DateTime,
    Boolean,
    String,
}

impl ScalarKind {
    /// Maps a declared criterion type to a scalar kind. Enum type names
    /// (`MaterialEnum`, `StatusEnum`, ...) travel as their text labels.
    pub fn from_declared(name: &str) -> Self {
        match name {
            "Int" => ScalarKind::Int,
            "Float" => ScalarKind::Float,
            "DateTime" => ScalarKind::DateTime,
            "Boolean" => ScalarKind::Boolean,
            _ => ScalarKind::String,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Float)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    DateTime(Timestamp),
    Boolean(bool),
    String(String),
}

impl ScalarValue {
    pub fn cast(raw: &str, kind: ScalarKind) -> PipenetResult<Self> {
        match kind {
            ScalarKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(ScalarValue::Int)
                .map_err(|err| PipenetError::invalid_value(format!("'{raw}' is not an Int: {err}"))),
            ScalarKind::Float => {
                let parsed = raw.trim().parse::<f64>().map_err(|err| {
                    PipenetError::invalid_value(format!("'{raw}' is not a Float: {err}"))
                })?;
                if !parsed.is_finite() {
                    return Err(PipenetError::invalid_value(format!(
                        "'{raw}' is not a finite Float"
                    )));
                }
                Ok(ScalarValue::Float(parsed))
            }
            ScalarKind::DateTime => Timestamp::parse(raw).map(ScalarValue::DateTime),
            ScalarKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(ScalarValue::Boolean(true)),
                "false" => Ok(ScalarValue::Boolean(false)),
                _ => Err(PipenetError::invalid_value(format!(
                    "'{raw}' is not a Boolean"
                ))),
            },
            ScalarKind::String => Ok(ScalarValue::String(raw.to_string())),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Int(_) => ScalarKind::Int,
            ScalarValue::Float(_) => ScalarKind::Float,
            ScalarValue::DateTime(_) => ScalarKind::DateTime,
            ScalarValue::Boolean(_) => ScalarKind::Boolean,
            ScalarValue::String(_) => ScalarKind::String,
        }
    }

    /// Converts the value for comparison against a column of `target` kind.
    /// Ints widen to Float; every other mismatch is rejected.
    pub fn coerce_to(self, target: ScalarKind) -> PipenetResult<Self> {
        match (self, target) {
            (value, kind) if value.kind() == kind => Ok(value),
            (ScalarValue::Int(value), ScalarKind::Float) => Ok(ScalarValue::Float(value as f64)),
            (value, kind) => Err(PipenetError::invalid_value(format!(
                "{:?} value cannot be compared with a {kind:?} field",
                value.kind()
            ))),
        }
    }
}
