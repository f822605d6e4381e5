//! Whole-set replacement of the user/group membership relation.
//!
//! Both directions clear the current set before attaching the new one, so anything missing
//! from the requested list is dropped. The two directions deliberately differ on unknown
//! identifiers: a user's group list creates the groups it names, while a group's member list
//! refuses users that do not exist.
//!
//! Callers run these inside a transaction and only commit on `Ok`.

use sqlx::{Error, SqliteConnection};

use crate::model::group::Group;
use crate::model::user::User;

#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("Unknown user {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Store(#[from] Error),
}

const CLEAR_USER_QUERY: &str = r#"DELETE FROM usergroup WHERE user_id = ?"#;
const CLEAR_GROUP_QUERY: &str = r#"DELETE FROM usergroup WHERE group_id = ?"#;
const ATTACH_QUERY: &str = r#"INSERT OR IGNORE INTO usergroup (user_id, group_id) VALUES (?, ?)"#;

/// Replace the groups of `user` with `groups`, creating any group that does not exist yet.
pub async fn set_user_groups(conn: &mut SqliteConnection, user: &User, groups: &[String]) -> Result<(), Error> {
    sqlx::query(CLEAR_USER_QUERY)
        .bind(user.id)
        .execute(&mut *conn)
        .await?;
    for groupid in groups {
        let group = Group::get_or_create(&mut *conn, groupid).await?;
        attach(&mut *conn, user.id, group.id).await?;
    }
    Ok(())
}

/// Replace the members of `group` with `users`. Fails on the first identifier that names no
/// existing user; the changes made so far are only undone if the caller rolls back.
pub async fn set_group_users(conn: &mut SqliteConnection, group: &Group, users: &[String]) -> Result<(), MembershipError> {
    sqlx::query(CLEAR_GROUP_QUERY)
        .bind(group.id)
        .execute(&mut *conn)
        .await?;
    for userid in users {
        let user = User::get(&mut *conn, userid)
            .await?
            .ok_or_else(|| MembershipError::UnknownUser(userid.clone()))?;
        attach(&mut *conn, user.id, group.id).await?;
    }
    Ok(())
}

async fn attach(conn: &mut SqliteConnection, user_id: i64, group_id: i64) -> Result<(), Error> {
    sqlx::query(ATTACH_QUERY)
        .bind(user_id)
        .bind(group_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{set_group_users, set_user_groups, MembershipError};
    use crate::model::group::Group;
    use crate::model::user::User;
    use crate::model::Store;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[actix_web::test]
    async fn user_groups_are_created_on_demand() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();
        let user = User::insert(&mut conn, "jdoe", "", "").await.unwrap();

        set_user_groups(&mut conn, &user, &ids(&["staff", "admin", "admin"]))
            .await
            .unwrap();

        assert_eq!(Group::list_ids(&mut conn).await.unwrap(), ids(&["admin", "staff"]));
        assert_eq!(user.groups(&mut conn).await.unwrap(), ids(&["admin", "staff"]));
    }

    #[actix_web::test]
    async fn user_groups_replace_previous_set() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();
        let user = User::insert(&mut conn, "jdoe", "", "").await.unwrap();

        set_user_groups(&mut conn, &user, &ids(&["admin", "staff"])).await.unwrap();
        set_user_groups(&mut conn, &user, &ids(&["staff"])).await.unwrap();

        assert_eq!(user.groups(&mut conn).await.unwrap(), ids(&["staff"]));
        // the dropped group itself survives
        assert!(Group::get(&mut conn, "admin").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn group_users_replace_previous_set() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.acquire().await.unwrap();
        User::insert(&mut conn, "alice", "", "").await.unwrap();
        User::insert(&mut conn, "bob", "", "").await.unwrap();
        let group = Group::insert(&mut conn, "admin").await.unwrap();

        set_group_users(&mut conn, &group, &ids(&["alice", "bob"])).await.unwrap();
        set_group_users(&mut conn, &group, &ids(&["bob"])).await.unwrap();

        assert_eq!(group.users(&mut conn).await.unwrap(), ids(&["bob"]));
    }

    #[actix_web::test]
    async fn unknown_user_rolls_back_whole_update() {
        let store = Store::in_memory().await.unwrap();
        let group = {
            let mut tx = store.begin().await.unwrap();
            User::insert(&mut tx, "alice", "", "").await.unwrap();
            let group = Group::insert(&mut tx, "admin").await.unwrap();
            set_group_users(&mut tx, &group, &ids(&["alice"])).await.unwrap();
            tx.commit().await.unwrap();
            group
        };

        {
            let mut tx = store.begin().await.unwrap();
            let err = set_group_users(&mut tx, &group, &ids(&["ghost"])).await.unwrap_err();
            assert!(matches!(err, MembershipError::UnknownUser(ref id) if id == "ghost"));
            // dropped without commit
        }

        let mut conn = store.acquire().await.unwrap();
        assert_eq!(group.users(&mut conn).await.unwrap(), ids(&["alice"]));
        assert!(User::get(&mut conn, "ghost").await.unwrap().is_none());
    }
}
