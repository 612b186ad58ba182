use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserId;

/// The verified subject of the current request.
///
/// `AuthMiddleware` inserts this into the request extensions after a token
/// verifies; handlers take it as an argument. It lives exactly as long as the
/// request. Extracting it on a route the middleware does not cover fails with
/// `AppError::MissingToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// Id of the subject every data access in this request must be scoped to.
    pub fn current_subject_id(&self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().copied();
        ready(user.ok_or_else(|| AppError::MissingToken.into()))
    }
}
