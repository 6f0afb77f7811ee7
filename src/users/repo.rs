use async_trait::async_trait;
use sqlx::PgPool;

use super::errors::UserError;
use super::repo_types::{NewUser, UserRecord};

/// Lookup-by-email user store.
///
/// `save` is insert-if-absent: an email already on file must fail with
/// [`UserError::DuplicateEmail`] atomically, whatever the caller checked before.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError>;
    async fn save(&self, user: NewUser) -> Result<UserRecord, UserError>;
}

/// PostgreSQL store; uniqueness comes from the `users_email_key` index.
#[derive(Clone)]
pub struct PgUserStore {
    pub db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn save(&self, user: NewUser) -> Result<UserRecord, UserError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }
}

/// In-process store, used when no database is configured and in tests.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    #[derive(Default)]
    struct Inner {
        next_id: i64,
        by_email: HashMap<String, UserRecord>,
    }

    #[derive(Default)]
    pub struct MemoryUserStore {
        inner: Mutex<Inner>,
    }

    impl MemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.inner.lock().map(|g| g.by_email.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn poisoned<T>(_: T) -> UserError {
        UserError::Repository("memory store lock poisoned".into())
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
            let inner = self.inner.lock().map_err(poisoned)?;
            Ok(inner.by_email.get(email).cloned())
        }

        async fn save(&self, user: NewUser) -> Result<UserRecord, UserError> {
            let mut inner = self.inner.lock().map_err(poisoned)?;
            if inner.by_email.contains_key(&user.email) {
                return Err(UserError::DuplicateEmail);
            }
            inner.next_id += 1;
            let record = UserRecord {
                id: inner.next_id,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            inner.by_email.insert(record.email.clone(), record.clone());
            Ok(record)
        }
    }

}
