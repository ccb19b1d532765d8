use crate::model::todo::Todo;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// `strftime` pattern of the public timestamp, e.g. `2024-01-01T10:00:00.000Z`.
pub const CONTRACT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Public single-todo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTodo {
    pub id: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Inbound create request: `{"text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

impl CreateTodoRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Builds a fresh todo from this request. Performs no validation.
    pub fn to_todo(&self) -> Todo {
        Todo::new(self.text.clone())
    }
}

/// Error envelope returned by the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Projects a todo into its public shape.
pub fn to_contract_todo(todo: &Todo) -> ContractTodo {
    ContractTodo {
        id: todo.id.clone(),
        text: todo.text.clone(),
        created_at: format_contract_timestamp(&todo.created_at),
    }
}

/// Projects a list, preserving order. Empty input yields an empty `Vec`,
/// which serializes as `[]`.
pub fn to_contract_list(todos: &[Todo]) -> Vec<ContractTodo> {
    todos.iter().map(to_contract_todo).collect()
}

/// Formats an instant as UTC `YYYY-MM-DDTHH:MM:SS.mmmZ`, whatever its offset.
pub fn format_contract_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .format(CONTRACT_TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn format_pads_milliseconds() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(
            format_contract_timestamp(&instant),
            "2024-01-01T10:00:00.000Z"
        );
    }

    #[test]
    fn format_truncates_sub_millisecond_precision() {
        let instant = DateTime::<Utc>::from_timestamp(1_704_103_200, 123_987_654).unwrap();
        assert_eq!(
            format_contract_timestamp(&instant),
            "2024-01-01T10:00:00.123Z"
        );
    }

    #[test]
    fn format_converts_offsets_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let instant = offset.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            format_contract_timestamp(&instant),
            "2024-01-01T10:00:00.000Z"
        );
    }

    #[test]
    fn create_request_requires_text_field() {
        let parsed: Result<CreateTodoRequest, _> = serde_json::from_str(r#"{"title":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn error_response_is_never_successful() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }
}
