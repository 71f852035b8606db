use sqlx::SqlitePool;

use crate::models::user::User;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct ToDoList {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

impl ToDoList {
    pub async fn create(
        pool: &SqlitePool,
        title: &str,
        content: &str,
        author: &User,
    ) -> Result<ToDoList, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO todolists (title, content, user_id)
            VALUES (?, ?, ?)
            RETURNING id, title, content, user_id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author.id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ToDoList>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, title, content, user_id
            FROM todolists
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All lists written by `author`, oldest first.
    pub async fn by_author(pool: &SqlitePool, author: &User) -> Result<Vec<ToDoList>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, title, content, user_id
            FROM todolists
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(author.id)
        .fetch_all(pool)
        .await
    }

    pub async fn save(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE todolists SET title = ?, content = ? WHERE id = ?")
            .bind(&self.title)
            .bind(&self.content)
            .bind(self.id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM todolists WHERE id = ?")
            .bind(self.id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub fn is_authored_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}
