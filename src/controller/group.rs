use actix_web::{delete, get, post, put, web::{self, Bytes, Json}, HttpResponse};

use crate::controller::parse_json;
use crate::error::ApiError;
use crate::model::{group::Group, membership, Store};
use crate::APP_TARGET;

pub fn configure_group_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/groups")
        .service(list_groups)
        .service(get_group)
        .service(create_group)
        .service(update_group)
        .service(delete_group)
    );
}

#[get("/")]
async fn list_groups(store: web::Data<Store>) -> Result<Json<Vec<String>>, ApiError> {
    let mut conn = store.acquire().await?;
    Ok(Json(Group::list_ids(&mut conn).await?))
}

/// Member list of a group. A group without members answers like a missing one.
#[get("/{groupid}")]
async fn get_group(store: web::Data<Store>, groupid: web::Path<String>) -> Result<Json<Vec<String>>, ApiError> {
    let mut conn = store.acquire().await?;
    let users = find_group(&mut conn, &groupid).await?.users(&mut conn).await?;
    if users.is_empty() {
        log::trace!(target: APP_TARGET, "Group is empty: {groupid}");
        return Err(ApiError::NotFound("Group empty"));
    }
    Ok(Json(users))
}

#[post("/{groupid}")]
async fn create_group(store: web::Data<Store>, groupid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    if Group::get(&mut tx, &groupid).await?.is_some() {
        log::trace!(target: APP_TARGET, "Group already exists: {groupid}");
        return Err(ApiError::Conflict("Group exists"));
    }
    Group::insert(&mut tx, &groupid).await?;
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Created group {groupid}");
    Ok(HttpResponse::Created().json("Added Successfully"))
}

/// Replace the member list. Every listed user must exist, otherwise nothing changes.
#[put("/{groupid}")]
async fn update_group(store: web::Data<Store>, groupid: web::Path<String>, body: Bytes) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    let group = find_group(&mut tx, &groupid).await?;
    let users: Vec<String> = parse_json(&body)?;

    if let Err(err) = membership::set_group_users(&mut tx, &group, &users).await {
        log::trace!(target: APP_TARGET, "Membership update of {groupid} rejected: {err}");
        tx.rollback().await?;
        return Err(err.into());
    }
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Updated members of group {groupid}");
    Ok(HttpResponse::Ok().json("Updated Successfully"))
}

#[delete("/{groupid}")]
async fn delete_group(store: web::Data<Store>, groupid: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let mut tx = store.begin().await?;
    find_group(&mut tx, &groupid).await?.delete(&mut tx).await?;
    tx.commit().await?;

    log::info!(target: APP_TARGET, "Deleted group {groupid}");
    Ok(HttpResponse::Ok().json("Deleted successfully"))
}

// PRIVATE FUNCTIONS

async fn find_group(conn: &mut sqlx::SqliteConnection, groupid: &str) -> Result<Group, ApiError> {
    Group::get(conn, groupid).await?.ok_or_else(|| {
        log::trace!(target: APP_TARGET, "Group not found: {groupid}");
        ApiError::NotFound("Group not found")
    })
}
