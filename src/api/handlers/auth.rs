use crate::{
    api::extract::JsonBody,
    auth::{
        middleware::{AuthUser, BasicCredentials},
        password,
        permissions::Role,
    },
    types::{AppError, AuthResponse, MessageResponse, Result, SignupRequest, UserResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Register a new user and return a token for them
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Invalid input or unknown role"),
        (status = 409, description = "Username already exists")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(role) => role
            .parse::<Role>()
            .map_err(|_| AppError::InvalidInput(format!("Unknown role '{}'", role)))?,
    };

    let user = state
        .credentials
        .create_user(&payload.username, &payload.password, role)
        .await?;

    let token = state.token_service.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(&user),
            token,
            expires_in: state.token_service.ttl_secs(),
        }),
    ))
}

/// Sign in with `Authorization: Basic base64(username:password)`
#[utoipa::path(
    post,
    path = "/signin",
    responses(
        (status = 200, description = "Signin successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or malformed header")
    ),
    tag = "auth",
    security(("basic" = []))
)]
pub async fn signin(
    State(state): State<AppState>,
    credentials: BasicCredentials,
) -> Result<Json<AuthResponse>> {
    let user = state
        .credentials
        .find_by_username(&credentials.username)
        .await?;

    // Unknown user and wrong password must be indistinguishable to the caller.
    let user = match user {
        Some(user) if password::verify_password(&credentials.password, &user.password_hash) => {
            user
        }
        Some(_) => {
            tracing::warn!("signin failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            password::verify_dummy(&credentials.password);
            tracing::warn!("signin failed: unknown user");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = state.token_service.issue(&user)?;
    tracing::info!(user_id = %user.id, "user signed in");

    Ok(Json(AuthResponse {
        user: UserResponse::from(&user),
        token,
        expires_in: state.token_service.ttl_secs(),
    }))
}

/// List every username. Requires the `delete` capability.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Usernames", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let users = state.credentials.list_users().await?;
    Ok(Json(users.into_iter().map(|user| user.username).collect()))
}

/// Any valid token may enter.
#[utoipa::path(
    get,
    path = "/secret",
    responses(
        (status = 200, description = "Welcome message", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn secret(AuthUser(claims): AuthUser) -> Json<MessageResponse> {
    tracing::debug!(sub = %claims.sub, "secret area visited");
    Json(MessageResponse {
        message: "Welcome to the secret area".to_string(),
    })
}
