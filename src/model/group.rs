use sqlx::{Error, FromRow, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Group {
    pub id: i64,
    pub groupid: String,
}

impl Group {
    const SELECT_QUERY: &'static str = r#"SELECT id, groupid FROM "groups" WHERE groupid = ?"#;
    const LIST_QUERY: &'static str = r#"SELECT groupid FROM "groups" ORDER BY groupid"#;
    const INSERT_QUERY: &'static str = r#"INSERT INTO "groups" (groupid) VALUES (?)"#;
    const DELETE_EDGES_QUERY: &'static str = r#"DELETE FROM usergroup WHERE group_id = ?"#;
    const DELETE_QUERY: &'static str = r#"DELETE FROM "groups" WHERE id = ?"#;
    const USERS_QUERY: &'static str = r#"SELECT u.userid FROM users u JOIN usergroup ug ON ug.user_id = u.id WHERE ug.group_id = ? ORDER BY u.userid"#;

    pub async fn get(conn: &mut SqliteConnection, groupid: &str) -> Result<Option<Self>, Error> {
        sqlx::query_as(Self::SELECT_QUERY)
            .bind(groupid)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_ids(conn: &mut SqliteConnection) -> Result<Vec<String>, Error> {
        sqlx::query_scalar(Self::LIST_QUERY).fetch_all(conn).await
    }

    pub async fn insert(conn: &mut SqliteConnection, groupid: &str) -> Result<Self, Error> {
        let id = sqlx::query(Self::INSERT_QUERY)
            .bind(groupid)
            .execute(conn)
            .await?
            .last_insert_rowid();
        Ok(Self { id, groupid: groupid.to_owned() })
    }

    pub async fn get_or_create(conn: &mut SqliteConnection, groupid: &str) -> Result<Self, Error> {
        match Self::get(&mut *conn, groupid).await? {
            Some(group) => Ok(group),
            None => {
                log::debug!(target: crate::APP_TARGET, "Creating group on assignment: {groupid}");
                Self::insert(conn, groupid).await
            }
        }
    }

    /// Remove the group and detach every member from it.
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

    /// Identifiers of the users that are members of this group.
    pub async fn users(&self, conn: &mut SqliteConnection) -> Result<Vec<String>, Error> {
        sqlx::query_scalar(Self::USERS_QUERY)
            .bind(self.id)
            .fetch_all(conn)
            .await
    }
}
