use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        Error::env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut) {
            tracing::warn!(error = %err, "database unavailable");
            return Error::unavailable_error();
        }

        Error::database_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        tracing::error!(error = %err, "authorization policy error");
        Error::unexpected_error()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            4 => (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable"),
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            100 | 105 => (StatusCode::CONFLICT, self.message.as_str()),
            102 => (StatusCode::FORBIDDEN, self.message.as_str()),
            103 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            104 => (StatusCode::NOT_FOUND, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl Error {
    pub fn invalid_state_error() -> Error {
        Error {
            code: 100,
            message: "invalid state".into(),
        }
    }

    pub fn invalid_input_error() -> Error {
        Error {
            code: 101,
            message: "invalid input".into(),
        }
    }

    pub fn unauthorized_error() -> Error {
        Error {
            code: 102,
            message: "unauthorized".into(),
        }
    }

    pub fn unauthenticated_error() -> Error {
        Error {
            code: 103,
            message: "authentication required".into(),
        }
    }

    pub fn not_found_error() -> Error {
        Error {
            code: 104,
            message: "not found".into(),
        }
    }

    pub fn already_rated_error() -> Error {
        Error {
            code: 105,
            message: "already rated".into(),
        }
    }

    pub fn env_var_error(_: env::VarError) -> Error {
        Error {
            code: 1,
            message: "environment variable error".into(),
        }
    }

    pub fn database_error<T: Debug>(err: T) -> Error {
        tracing::error!(error = ?err, "database error");

        Error {
            code: 2,
            message: "database error".into(),
        }
    }

    pub fn unexpected_error() -> Error {
        Error {
            code: 3,
            message: "unexpected error".into(),
        }
    }

    pub fn unavailable_error() -> Error {
        Error {
            code: 4,
            message: "database unavailable".into(),
        }
    }

    pub fn is_invalid_state_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_unauthorized_error(&self) -> bool {
        self.code == 102
    }

    pub fn is_unauthenticated_error(&self) -> bool {
        self.code == 103
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 104
    }

    pub fn is_already_rated_error(&self) -> bool {
        self.code == 105
    }

    /// Errors worth retrying: the store could not be reached, the request itself was fine.
    pub fn is_transient(&self) -> bool {
        self.code == 4
    }
}
