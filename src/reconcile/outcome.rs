use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Remove,
}

/// What one reconciliation did, printed as JSON by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub operation: Operation,
    /// response body of the mutating call, untouched
    pub token: Option<Value>,
}

impl Outcome {
    pub fn created(token: Value) -> Self {
        Self {
            changed: true,
            operation: Operation::Create,
            token: Some(token),
        }
    }

    pub fn updated(changed: bool, token: Value) -> Self {
        Self {
            changed,
            operation: Operation::Update,
            token: Some(token),
        }
    }

    pub fn removed(changed: bool) -> Self {
        Self {
            changed,
            operation: Operation::Remove,
            token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remove_outcome_serializes_null_token() {
        assert_eq!(
            serde_json::to_value(Outcome::removed(false)).unwrap(),
            json!({"changed": false, "operation": "remove", "token": null})
        );
    }
}
