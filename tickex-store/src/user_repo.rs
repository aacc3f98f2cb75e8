use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tickex_core::models::{User, UserChanges};
use tickex_core::repository::{RepoError, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    gender: String,
    age: i32,
    profile_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            gender: row.gender,
            age: row.age,
            profile_image: row.profile_image,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, phone, gender, age, profile_image, created_at";

pub(crate) fn map_db_err(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return RepoError::Duplicate;
        }
    }
    RepoError::Other(err.into())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, phone, gender, age, profile_image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.gender)
        .bind(user.age)
        .bind(&user.profile_image)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, RepoError> {
        // COALESCE keeps untouched columns; one round trip returns the
        // updated record.
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                gender = COALESCE($4, gender),
                age = COALESCE($5, age),
                profile_image = COALESCE($6, profile_image),
                password_hash = COALESCE($7, password_hash)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.gender)
        .bind(changes.age)
        .bind(&changes.profile_image)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }
}
