use crate::prelude::*;

/// What `tx` and `continue_tx` hand back: `{"status": "success", "data": doc}` or
/// `{"status": "error", "data": cause}`. Failures never escape as an [Err].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum GnapOutcome<T> {
    Success(T),
    Error(String),
}

impl<T> GnapOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error(cause) => Some(cause),
        }
    }
}

impl<T> From<RustyGnapResult<T>> for GnapOutcome<T> {
    fn from(result: RustyGnapResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_serialize_adjacently_tagged() {
        let outcome = GnapOutcome::Success(json!({"instance_id": "7C7C4AZ9KHRS6X63AJAO"}));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "success", "data": {"instance_id": "7C7C4AZ9KHRS6X63AJAO"}})
        );

        let outcome = GnapOutcome::<()>::from(Err(RustyGnapError::SubjectMissing));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "error", "data": "Access token subject missing"})
        );
        assert_eq!(outcome.error(), Some("Access token subject missing"));
    }
}
