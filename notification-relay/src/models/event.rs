use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Which request bodies the relay accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// `fris` and `team` are both required; `message` is ignored.
    Strict,
    /// Either `message`, or `fris` and `team` together.
    #[default]
    Flexible,
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationPolicy::Strict => write!(f, "strict"),
            ValidationPolicy::Flexible => write!(f, "flexible"),
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "flexible" => Ok(ValidationPolicy::Flexible),
            other => Err(format!(
                "unknown validation policy '{}', expected 'strict' or 'flexible'",
                other
            )),
        }
    }
}

/// The inbound request body, after JSON parsing.
///
/// Fields are lenient: non-zero numbers are kept as their JSON text and `true`
/// reads as `"true"`. Empty strings, zero, `false`, `null`, arrays and objects
/// read as absent.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct IncomingEvent {
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fris: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

/// An event that passed validation under the active policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedEvent {
    Custom { message: String },
    FrisbeeCollected { fris: String, team: String },
}

impl ValidatedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidatedEvent::Custom { .. } => "custom",
            ValidatedEvent::FrisbeeCollected { .. } => "frisbee_collected",
        }
    }
}
