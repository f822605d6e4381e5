use sqlx::{Error, FromRow, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    const SELECT_QUERY: &'static str = r#"SELECT id, userid, first_name, last_name FROM users WHERE userid = ?"#;
    const LIST_QUERY: &'static str = r#"SELECT userid FROM users ORDER BY userid"#;
    const INSERT_QUERY: &'static str = r#"INSERT INTO users (userid, first_name, last_name) VALUES (?, ?, ?)"#;
    const UPDATE_QUERY: &'static str = r#"UPDATE users SET first_name = ?, last_name = ? WHERE id = ?"#;
    const DELETE_EDGES_QUERY: &'static str = r#"DELETE FROM usergroup WHERE user_id = ?"#;
    const DELETE_QUERY: &'static str = r#"DELETE FROM users WHERE id = ?"#;
    const GROUPS_QUERY: &'static str = r#"SELECT g.groupid FROM "groups" g JOIN usergroup ug ON ug.group_id = g.id WHERE ug.user_id = ? ORDER BY g.groupid"#;

    pub async fn get(conn: &mut SqliteConnection, userid: &str) -> Result<Option<Self>, Error> {
        sqlx::query_as(Self::SELECT_QUERY)
            .bind(userid)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_ids(conn: &mut SqliteConnection) -> Result<Vec<String>, Error> {
        sqlx::query_scalar(Self::LIST_QUERY).fetch_all(conn).await
    }

    pub async fn insert(conn: &mut SqliteConnection, userid: &str, first_name: &str, last_name: &str) -> Result<Self, Error> {
        let id = sqlx::query(Self::INSERT_QUERY)
            .bind(userid)
            .bind(first_name)
            .bind(last_name)
            .execute(conn)
            .await?
            .last_insert_rowid();
        Ok(Self {
            id,
            userid: userid.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    /// Persist the current name fields.
    pub async fn update(&self, conn: &mut SqliteConnection) -> Result<(), Error> {
        sqlx::query(Self::UPDATE_QUERY)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(self.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Remove the user together with every membership edge pointing at it.
    pub async fn delete(&self, conn: &mut SqliteConnection) -> Result<(), Error> {
        sqlx::query(Self::DELETE_EDGES_QUERY)
            .bind(self.id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(Self::DELETE_QUERY)
            .bind(self.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Identifiers of the groups this user belongs to.
    pub async fn groups(&self, conn: &mut SqliteConnection) -> Result<Vec<String>, Error> {
        sqlx::query_scalar(Self::GROUPS_QUERY)
            .bind(self.id)
            .fetch_all(conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::User;
    use crate::model::membership;
    use crate::model::Store;

    #[actix_web::test]
    async fn insert_then_get() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();

        let created = User::insert(&mut conn, "jdoe", "John", "Doe").await.unwrap();
        let fetched = User::get(&mut conn, "jdoe").await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert!(fetched.groups(&mut conn).await.unwrap().is_empty());
        assert!(User::get(&mut conn, "nobody").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn update_overwrites_names() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();

        let mut user = User::insert(&mut conn, "jdoe", "", "").await.unwrap();
        user.first_name = "Jane".into();
        user.update(&mut conn).await.unwrap();

        let fetched = User::get(&mut conn, "jdoe").await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Jane");
        assert_eq!(fetched.last_name, "");
    }

    #[actix_web::test]
    async fn delete_drops_memberships() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();

        let user = User::insert(&mut conn, "jdoe", "", "").await.unwrap();
        membership::set_user_groups(&mut conn, &user, &["admin".to_owned()])
            .await
            .unwrap();
        user.delete(&mut conn).await.unwrap();

        assert!(User::get(&mut conn, "jdoe").await.unwrap().is_none());
        let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usergroup")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(edges, 0);
        assert_eq!(User::list_ids(&mut conn).await.unwrap(), Vec::<String>::new());
    }
}
