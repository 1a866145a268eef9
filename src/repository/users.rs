//! Users repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserDirectory;
use crate::error::AppResult;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UsersRepository {
    async fn find_srn(&self, user_id: i32) -> AppResult<Option<String>> {
        let srn = sqlx::query_scalar::<_, String>("SELECT srn FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(srn)
    }
}
