use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        password::{burn_verification, hash_password, verify_password},
        repo_types::NewUser,
    },
    error::AppError,
    state::AppState,
};

/// Validates, persists and signs in a new user. Storage is not touched unless
/// the input is well formed; duplicates are detected by the store's unique
/// constraints.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    let reg = req.validate()?;

    let password_hash = hash_password(&reg.password)?;
    let user = state
        .users
        .create(NewUser {
            username: reg.username,
            email: reg.email,
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user failed");
            AppError::from(e)
        })?;

    let token = state.keys.issue(user.id)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(AuthResponse::new(user, token))
}

/// Checks credentials and issues a fresh token. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let creds = req.validate()?;

    let Some(user) = state.users.find_by_email(&creds.email).await? else {
        burn_verification(&creds.password);
        warn!(email = %creds.email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&creds.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.keys.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse::new(user, token))
}
