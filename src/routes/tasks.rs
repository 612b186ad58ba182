use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): `pending` or `completed`.
/// - `search` (optional): case-insensitive match in title or description.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task`, newest first.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = state
        .tasks
        .list(user.current_subject_id(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: malformed body or failed validation.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = state
        .tasks
        .create(user.current_subject_id(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Fetches one task.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get(user.current_subject_id(), task_id.into_inner())
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the given fields of a task; omitted fields are left unchanged.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: malformed body or failed validation.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = state
        .tasks
        .update(user.current_subject_id(), task_id.into_inner(), &task_data)
        .await?
        .ok_or_else(task_not_found)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no such task, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .tasks
        .delete(user.current_subject_id(), task_id.into_inner())
        .await?;
    if !deleted {
        return Err(task_not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}
