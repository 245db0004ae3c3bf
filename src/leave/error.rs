use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Error taxonomy of the leave core. Every variant carries a distinct,
/// human-readable message so the UI never has to map codes itself.
///
/// The entitlement clamp (`ExceedsEntitlement` in the business rules) is not
/// here: it is a warning attached to a successful response, never a failure.
#[derive(Debug, Display)]
pub enum LeaveError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "This request was already decided by another approver; refresh and review the latest state")]
    AlreadyDecided,

    #[display(fmt = "The edit window has closed: a decision has been recorded on this request")]
    EditWindowClosed,

    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    #[display(fmt = "Leave request not found")]
    NotFound,

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),

    #[display(fmt = "Internal Server Error")]
    Corrupt(String),
}

impl LeaveError {
    /// Stable machine-readable discriminator for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            LeaveError::Validation(_) => "validation_error",
            LeaveError::AlreadyDecided => "already_decided",
            LeaveError::EditWindowClosed => "edit_window_closed",
            LeaveError::Unauthorized(_) => "unauthorized",
            LeaveError::NotFound => "not_found",
            LeaveError::Database(_) | LeaveError::Corrupt(_) => "internal",
        }
    }
}

impl From<sqlx::Error> for LeaveError {
    fn from(err: sqlx::Error) -> Self {
        LeaveError::Database(err)
    }
}

impl actix_web::ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::Validation(_) => StatusCode::BAD_REQUEST,
            LeaveError::AlreadyDecided => StatusCode::CONFLICT,
            LeaveError::EditWindowClosed => StatusCode::FORBIDDEN,
            LeaveError::Unauthorized(_) => StatusCode::FORBIDDEN,
            LeaveError::NotFound => StatusCode::NOT_FOUND,
            LeaveError::Database(_) | LeaveError::Corrupt(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let LeaveError::Database(e) = self {
            tracing::error!(error = %e, "Database error");
        }
        if let LeaveError::Corrupt(detail) = self {
            tracing::error!(detail = %detail, "Corrupt record");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string(),
            "kind": self.kind(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn http_mapping_is_distinct_per_kind() {
        assert_eq!(
            LeaveError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(LeaveError::AlreadyDecided.status_code(), StatusCode::CONFLICT);
        assert_eq!(LeaveError::EditWindowClosed.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            LeaveError::Unauthorized("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(LeaveError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            LeaveError::Validation("start_date cannot be after end_date".into()).to_string(),
            "start_date cannot be after end_date"
        );
        assert!(LeaveError::AlreadyDecided.to_string().contains("already decided"));
        assert_ne!(
            LeaveError::AlreadyDecided.kind(),
            LeaveError::EditWindowClosed.kind()
        );
    }
}
