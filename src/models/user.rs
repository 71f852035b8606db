use sqlx::SqlitePool;

pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub image_file: String,
    pub password: String, // bcrypt hash
}

/// A registration that has passed validation; the password is already hashed.
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub async fn create(pool: &SqlitePool, new_user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password, image_file)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, image_file, password
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(DEFAULT_IMAGE_FILE)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, username, email, image_file, password
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, username, email, image_file, password
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn username_taken(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn email_taken(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    /// Writes the account fields back; the password is never touched here.
    pub async fn save_account(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, image_file = ?
            WHERE id = ?
            "#,
        )
        .bind(&self.username)
        .bind(&self.email)
        .bind(&self.image_file)
        .bind(self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub fn image_url(&self) -> String {
        format!("/static/profile_pics/{}", self.image_file)
    }
}
