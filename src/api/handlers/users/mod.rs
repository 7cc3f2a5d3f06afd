//! User CRUD endpoints.
//!
//! Handlers only parse inputs and map outcomes to status codes; `storage`
//! owns the SQL. Every failure is rendered as `{"error": "<message>"}`.
//!
//! Flow Overview:
//! 1) Validate the path id and/or JSON body (400 on failure, nothing touched).
//! 2) Run a single statement through `storage`.
//! 3) Map `StorageError::NotFound` to 404 and any other database error to 500.

pub mod storage;
pub mod types;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Extension, Path, RawQuery},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use url::form_urlencoded;

use self::storage::StorageError;
use self::types::{parse_user_id, DeleteResult, ErrorBody, Page, User, UserPayload};

pub const MSG_INVALID_USER_ID: &str = "Invalid user ID";
pub const MSG_INVALID_PAYLOAD: &str = "Invalid request payload";
pub const MSG_USER_NOT_FOUND: &str = "User not found";

#[derive(Debug)]
pub enum ApiError {
    InvalidUserId,
    InvalidPayload,
    NotFound,
    Database(sqlx::Error),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound,
            StorageError::Database(err) => Self::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidUserId => (StatusCode::BAD_REQUEST, MSG_INVALID_USER_ID.to_string()),
            Self::InvalidPayload => (StatusCode::BAD_REQUEST, MSG_INVALID_PAYLOAD.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, MSG_USER_NOT_FOUND.to_string()),
            Self::Database(err) => {
                error!("Failed to handle user request: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn user_id(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    let Ok(Path(raw)) = path else {
        return Err(ApiError::InvalidUserId);
    };
    parse_user_id(&raw).ok_or(ApiError::InvalidUserId)
}

fn user_payload(payload: Result<Json<UserPayload>, JsonRejection>) -> Result<UserPayload, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => {
            debug!("Rejected user payload: {rejection}");
            Err(ApiError::InvalidPayload)
        }
    }
}

/// First occurrence of `count` and `start` in the raw query string.
fn page(query: Option<&str>) -> Page {
    let mut count = None;
    let mut start = None;

    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "count" if count.is_none() => count = Some(value.into_owned()),
            "start" if start.is_none() => start = Some(value.into_owned()),
            _ => {}
        }
    }

    Page::from_query(count.as_deref(), start.as_deref())
}

#[utoipa::path(
    get,
    path = "/users",
    params(
        ("count" = Option<i64>, Query, description = "Rows to return, 1..=10 (default 10)"),
        ("start" = Option<i64>, Query, description = "Rows to skip, >= 0 (default 0)")
    ),
    responses(
        (status = 200, description = "Users in storage order", body = [User]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip(pool))]
pub async fn list_users(pool: Extension<PgPool>, RawQuery(query): RawQuery) -> Response {
    let page = page(query.as_deref());

    match storage::get_users(&pool, page.start, page.count).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i32, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid user id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip(pool, path))]
pub async fn get_user(
    pool: Extension<PgPool>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match user_id(path) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match storage::get_user(&pool, id).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request payload", body = ErrorBody),
        (status = 500, description = "Storage failure, e.g. duplicate email", body = ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip(pool, payload))]
pub async fn create_user(
    pool: Extension<PgPool>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Response {
    let payload = match user_payload(payload) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };

    match storage::create_user(&pool, &payload.name, &payload.email).await {
        Ok(id) => {
            debug!("Created user {id}");
            let user = User {
                id,
                name: payload.name,
                email: payload.email,
            };
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ("id" = i32, Path, description = "User id")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated; also returned when no row matched the id", body = User),
        (status = 400, description = "Invalid user id or request payload", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip(pool, path, payload))]
pub async fn update_user(
    pool: Extension<PgPool>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Response {
    let id = match user_id(path) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    let payload = match user_payload(payload) {
        Ok(payload) => payload,
        Err(err) => return err.into_response(),
    };

    match storage::update_user(&pool, id, &payload.name, &payload.email).await {
        Ok(()) => {
            let user = User {
                id,
                name: payload.name,
                email: payload.email,
            };
            (StatusCode::OK, Json(user)).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = i32, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User deleted; also returned when no row matched the id", body = DeleteResult),
        (status = 400, description = "Invalid user id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    ),
    tag = "users"
)]
#[instrument(skip(pool, path))]
pub async fn delete_user(
    pool: Extension<PgPool>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match user_id(path) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match storage::delete_user(&pool, id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResult::success())).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
