use actix_web::{delete, get, post, put, web::{self, Bytes, Json}, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::controller::parse_json;
use crate::error::ApiError;
use crate::model::{membership, user::User, Store};
use crate::APP_TARGET;

/// Body of `POST` and `PUT /users/{userid}`. Missing (or `null`) fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub groups: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
    pub groups: Vec<String>,
}

pub fn configure_user_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/users")
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
    );
}

#[get("/")]
async fn list_users(store: web::Data<Store>) -> Result<Json<Vec<String>>, ApiError> {
    let mut conn = store.acquire().await?;
    Ok(Json(User::list_ids(&mut conn).await?))
}

#[get("/{userid}")]
async fn get_user(store: web::Data<Store>, userid: web::Path<String>) -> Result<Json<UserView>, ApiError> {
    let mut conn = store.acquire().await?;
    let user = find_user(&mut conn, &userid).await?;
    let groups = user.groups(&mut conn).await?;
    Ok(Json(UserView {
        userid: user.userid,
        first_name: user.first_name,
        last_name: user.last_name,
        groups,
    }))
}

#[post("/{userid}")]
async fn create_user(store: web::Data<Store>, userid: web::Path<String>, body: Bytes) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    if User::get(&mut tx, &userid).await?.is_some() {
        log::trace!(target: APP_TARGET, "User already exists: {userid}");
        return Err(ApiError::Conflict("User Exists"));
    }
    let payload: UserPayload = parse_json(&body)?;

    let user = User::insert(
        &mut tx,
        &userid,
        payload.first_name.as_deref().unwrap_or_default(),
        payload.last_name.as_deref().unwrap_or_default(),
    ).await?;
    if let Some(groups) = payload.groups {
        membership::set_user_groups(&mut tx, &user, &groups).await?;
    }
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Created user {userid}");
    Ok(HttpResponse::Created().json("Added Successfully"))
}

#[put("/{userid}")]
async fn update_user(store: web::Data<Store>, userid: web::Path<String>, body: Bytes) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    let mut user = find_user(&mut tx, &userid).await?;
    let payload: UserPayload = parse_json(&body)?;

    if payload.first_name.is_some() || payload.last_name.is_some() {
        if let Some(first_name) = payload.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = payload.last_name {
            user.last_name = last_name;
        }
        user.update(&mut tx).await?;
    }
    if let Some(groups) = payload.groups {
        membership::set_user_groups(&mut tx, &user, &groups).await?;
    }
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Updated user {userid}");
    Ok(HttpResponse::Ok().json("Updated Successfully"))
}

#[delete("/{userid}")]
async fn delete_user(store: web::Data<Store>, userid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    find_user(&mut tx, &userid).await?.delete(&mut tx).await?;
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Deleted user {userid}");
    Ok(HttpResponse::Ok().json("Deleted successfully"))
}

// PRIVATE FUNCTIONS

async fn find_user(conn: &mut sqlx::SqliteConnection, userid: &str) -> Result<User, ApiError> {
    User::get(conn, userid).await?.ok_or_else(|| {
        log::trace!(target: APP_TARGET, "User not found: {userid}");
        ApiError::NotFound("User not found")
    })
}
