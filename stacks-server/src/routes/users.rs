//! User routes
//!
//! Responses go through [`UserView`]; the stored password is accepted on
//! input and never serialized back out.

use axum::extract::{Path, State};
use axum::Json;

use crate::db::Database;
use crate::error::ServerResult;
use crate::extract::LegacyJson;
use crate::models::{CreateUserRequest, UserPatch, UserView};

/// POST /user/add - Register a new user
pub async fn add_user(
    State(db): State<Database>,
    LegacyJson(req): LegacyJson<CreateUserRequest>,
) -> ServerResult<Json<&'static str>> {
    db.add_user(&req)?;
    Ok(Json("User added successfully"))
}

/// GET /user/get - List all users
pub async fn get_all_users(State(db): State<Database>) -> ServerResult<Json<Vec<UserView>>> {
    let users = db.list_users()?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// GET /user/get/{id} - Get one user, or JSON null when absent
pub async fn get_one_user(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ServerResult<Json<Option<UserView>>> {
    let user = db.get_user(id)?;
    Ok(Json(user.map(UserView::from)))
}

/// PUT /user/update/{id} - Partially update a user by id
pub async fn update_user(
    State(db): State<Database>,
    Path(id): Path<i64>,
    LegacyJson(patch): LegacyJson<UserPatch>,
) -> ServerResult<Json<String>> {
    let message = match db.update_user(id, &patch)? {
        Some(_) => "User updated successfully".to_string(),
        None => format!("Error: user with id of {} doesn't exist.", id),
    };

    Ok(Json(message))
}

/// DELETE /user/delete/{id} - Remove a user; missing ids are a no-op
pub async fn delete_user(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> ServerResult<Json<String>> {
    let message = if db.delete_user(id)? {
        "User deleted successfully".to_string()
    } else {
        format!("Error: user with id of {} doesn't exist.", id)
    };

    Ok(Json(message))
}
