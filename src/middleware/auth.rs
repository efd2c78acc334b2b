// Caller identity
// Authentication happens upstream; the gateway forwards the verified user id.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::types::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl CurrentUser {
    pub fn from_header(value: Option<&str>) -> Result<Self, AppError> {
        let raw = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Unauthorized(format!("missing {}", USER_ID_HEADER)))?;

        Uuid::parse_str(raw)
            .map(CurrentUser)
            .map_err(|_| AppError::Unauthorized(format!("invalid {}", USER_ID_HEADER)))
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        Self::from_header(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_uuid_header() {
        let id = Uuid::new_v4();
        let user = CurrentUser::from_header(Some(&id.to_string())).unwrap();
        assert_eq!(user, CurrentUser(id));
    }

    #[test]
    fn test_rejects_missing_or_garbage() {
        assert!(matches!(
            CurrentUser::from_header(None),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            CurrentUser::from_header(Some("  ")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            CurrentUser::from_header(Some("user-1")),
            Err(AppError::Unauthorized(_))
        ));
    }
}
