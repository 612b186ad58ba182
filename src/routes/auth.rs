use crate::{
    auth::{
        hash_password, verify_decoy, verify_password, AuthResponse, LoginRequest,
        RegisterRequest,
    },
    error::AppError,
    models::PublicUser,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Hashes the password, stores the credential and returns a token for the new
/// identity. A taken email surfaces as `DuplicateEmail` from the store's
/// uniqueness constraint; there is no separate existence check.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let mut request = register_data.into_inner();
    request.email = request.normalized_email();
    request.validate()?;

    let RegisterRequest { email, password } = request;
    let password_hash = web::block(move || hash_password(&password)).await??;

    let credential = state.credentials.create(&email, &password_hash).await?;
    let token = state.tokens.issue(credential.id)?;
    log::info!("registered user {}", credential.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: PublicUser::from(&credential),
    }))
}

/// Login user
///
/// Unknown email and wrong password produce the same `InvalidCredentials`
/// error, and both pay for one bcrypt comparison.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let email = login_data.normalized_email();

    let credential = state.credentials.find_by_email(&email).await?;

    let LoginRequest { password, .. } = login_data.into_inner();
    let digest = credential.as_ref().map(|c| c.password_hash.clone());
    let verified = web::block(move || match digest {
        Some(digest) => verify_password(&password, &digest),
        None => verify_decoy(&password),
    })
    .await??;

    let credential = match credential {
        Some(credential) if verified => credential,
        _ => return Err(AppError::InvalidCredentials),
    };

    let token = state.tokens.issue(credential.id)?;
    log::info!("user {} logged in", credential.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: PublicUser::from(&credential),
    }))
}
