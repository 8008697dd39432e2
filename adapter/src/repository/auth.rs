use async_trait::async_trait;
use derive_new::new;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use kernel::model::id::UserId;
use kernel::repository::auth::AuthRepository;
use serde::Deserialize;
use shared::error::{AppError, AppResult};

use crate::database::ConnectionPool;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i32,
}

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    jwt_secret: String,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(&self, access_token: &str) -> AppResult<Option<UserId>> {
        // 署名が正しくないトークンはセッションを見るまでもなく弾く
        let Some(user_id) = verify_token(access_token, &self.jwt_secret) else {
            return Ok(None);
        };

        // 署名が正しくてもセッションが残っていなければ認証しない
        let session_user = sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT user_id FROM sessions WHERE token = $1
            "#,
        )
        .bind(access_token)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(session_user.filter(|id| *id == user_id))
    }
}

fn verify_token(token: &str, secret: &str) -> Option<UserId> {
    let mut validation = Validation::new(Algorithm::HS256);
    // 発行側は exp を付けないことがあるので必須にはしない（付いていれば検証される）
    validation.required_spec_claims.clear();

    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Some(UserId::new(data.claims.user_id)),
        Err(e) => {
            tracing::debug!(error.message = %e, "rejected access token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct TestClaims {
        user_id: i32,
    }

    fn sign(user_id: i32, secret: &str) -> String {
        encode(
            &Header::default(),
            &TestClaims { user_id },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("signing should succeed")
    }

    #[test]
    fn verify_token_reads_user_id_claim() {
        let token = sign(7, "secret");
        assert_eq!(verify_token(&token, "secret"), Some(UserId::new(7)));
    }

    #[test]
    fn verify_token_rejects_wrong_secret_and_garbage() {
        let token = sign(7, "secret");
        assert_eq!(verify_token(&token, "other"), None);
        assert_eq!(verify_token("not-a-jwt", "secret"), None);
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    #[ignore = "requires DATABASE_URL"]
    async fn token_without_session_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = AuthRepositoryImpl::new(ConnectionPool::new(pool), "secret".into());

        let token = sign(2, "secret");
        assert_eq!(repo.fetch_user_id_from_token(&token).await?, None);
        Ok(())
    }
}
