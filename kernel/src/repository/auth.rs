use crate::model::id::UserId;
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // アクセストークンを検証し、有効なセッションがあればそのユーザー ID を返す
    async fn fetch_user_id_from_token(&self, access_token: &str) -> AppResult<Option<UserId>>;
}
