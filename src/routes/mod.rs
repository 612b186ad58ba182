pub mod auth;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Registers the whole API under `/api`.
///
/// `/api/auth/*` is public. `/api/tasks/*` sits behind `AuthMiddleware`, so
/// its handlers only ever run for a verified subject. Malformed JSON bodies are
/// reported as `ValidationError`; an unparsable task id is a 404.
pub fn config(cfg: &mut web::ServiceConfig, state: web::Data<AppState>) {
    let gate = AuthMiddleware::new(state.tokens.clone());

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::ValidationError(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::ValidationError(err.to_string()).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|_err, _req| {
            AppError::NotFound("Task not found".into()).into()
        }))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(gate)
                        .service(tasks::list_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}
