use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;
use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiError>;

const UNIQUE_VIOLATION: &str = "23505";

/// Every failure a handler can report, mapped onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    /// A stored row that violates a record invariant.
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: Uuid, reason: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Turns a unique-constraint violation into `Conflict(msg)`; any other
    /// driver error stays a database error.
    pub fn conflict_on_unique(err: sqlx::Error, msg: &str) -> Self {
        let unique = matches!(
            &err,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        );
        if unique {
            Self::Conflict(msg.to_string())
        } else {
            Self::Database(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidRecord { .. } | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
            // Do not leak driver details to the client.
            let msg = match &self {
                Self::InvalidRecord { .. } => self.to_string(),
                _ => "Internal server error".to_string(),
            };
            return (status, msg).into_response();
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("Payment").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ApiError::NotFound("User").to_string(), "User not found");
    }

    #[test]
    fn invalid_record_message_carries_id_and_reason() {
        let id = Uuid::new_v4();
        let err = ApiError::InvalidRecord {
            id,
            reason: "negative amount".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("negative amount"));
    }

    #[derive(Debug)]
    struct DriverError(&'static str);

    impl std::fmt::Display for DriverError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "driver error {}", self.0)
        }
    }

    impl std::error::Error for DriverError {}

    impl sqlx::error::DatabaseError for DriverError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(std::borrow::Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.0 == UNIQUE_VIOLATION {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }
    }

    #[test]
    fn duplicate_key_becomes_conflict() {
        let err = sqlx::Error::Database(Box::new(DriverError(UNIQUE_VIOLATION)));
        let mapped = ApiError::conflict_on_unique(err, "Email already registered");
        assert_eq!(mapped.status(), StatusCode::CONFLICT);
        assert_eq!(mapped.to_string(), "Email already registered");
    }

    #[test]
    fn other_driver_errors_stay_internal() {
        let err = sqlx::Error::Database(Box::new(DriverError("23503")));
        let mapped = ApiError::conflict_on_unique(err, "Email already registered");
        assert!(matches!(mapped, ApiError::Database(_)));

        let mapped = ApiError::conflict_on_unique(sqlx::Error::PoolTimedOut, "dup");
        assert_eq!(mapped.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn server_errors_hide_driver_details() {
        let res = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
