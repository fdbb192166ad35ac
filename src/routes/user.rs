use crate::{
    auth::{DEFAULT_TOKEN_HOURS, authenticate, create_token},
    dto::{
        AuthResponse, AvatarResponse, ChangeAvatarRequest, CreateUserRequest,
        FetchUserByIdRequest, LoginUserRequest, UserResponse, UserSummary,
    },
    errors::{ApiError, format_validation_errors},
    models::User,
    routes::parse_id,
    states::AppState,
    store::StoreError,
};
use axum::{Json, extract::State, http::HeaderMap};
use bcrypt::{DEFAULT_COST, hash, verify};
use tracing::info;
use validator::Validate;

/// POST /auth/create-user
/// Body: { "email": "...", "username": "...", "password": "..." }
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let hashed_password = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let user = User::new(payload.email, payload.username, hashed_password);
    state.store.insert_user(user.clone()).map_err(|e| match e {
        StoreError::EmailTaken => ApiError::EmailTaken,
        StoreError::UsernameTaken => ApiError::UsernameTaken,
        other => ApiError::Storage(format!("{other:?}")),
    })?;

    let token = create_token(&user, &state.jwt_secret, DEFAULT_TOKEN_HOURS)?;

    info!("New user registered: {}", user.email);

    Ok(Json(AuthResponse {
        ok: true,
        message: "User successfully created and logged in.".to_string(),
        token,
        user_id: user.id,
        username: user.username,
        avatar_url: user.avatar_url,
    }))
}

/// POST /auth/login-user
/// Body: { "email": "...", "password": "...", "expire": 12 }
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginUserRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    // Find user by email
    let user = state
        .store
        .user_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let valid = verify(&payload.password, &user.hashed_password)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // Generate token, honoring a requested longer expiry
    let expires_hours = payload.expire.unwrap_or(DEFAULT_TOKEN_HOURS).max(1);
    let token = create_token(&user, &state.jwt_secret, expires_hours)?;

    info!("User logged in: {}", user.email);

    Ok(Json(AuthResponse {
        ok: true,
        message: "User successfully logged in.".to_string(),
        token,
        user_id: user.id,
        username: user.username,
        avatar_url: user.avatar_url,
    }))
}

/// POST /auth/change-avatar
/// Headers: Authorization: Bearer <token>
pub async fn change_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangeAvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| format_validation_errors(&e))?;

    let user = authenticate(&headers, &state)?;
    state
        .store
        .update_user(user.id, |user| {
            user.avatar_url = payload.avatar_url.clone();
        })
        .map_err(|_| ApiError::NotAuthorized)?;

    Ok(Json(AvatarResponse {
        ok: true,
        message: "Avatar changed.".to_string(),
        path: payload.avatar_url,
    }))
}

/// POST /auth/fetch-user-by-id
/// Body: { "userId": "..." }
pub async fn fetch_user_by_id(
    State(state): State<AppState>,
    Json(payload): Json<FetchUserByIdRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = parse_id(&payload.user_id)?;

    let body = match state.store.user_by_id(user_id) {
        Some(user) => UserResponse {
            ok: true,
            message: "User found.".to_string(),
            user: Some(UserSummary::from(&user)),
        },
        None => UserResponse {
            ok: false,
            message: "User not found.".to_string(),
            user: None,
        },
    };
    Ok(Json(body))
}
