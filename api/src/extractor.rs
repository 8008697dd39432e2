use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::AppError;

pub struct AuthorizedUser {
    pub user_id: UserId,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user_id
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        // Authorization: Bearer <token> 以外はすべて未認証として扱う
        let access_token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::UnauthenticatedError)?;

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { user_id })
    }
}
