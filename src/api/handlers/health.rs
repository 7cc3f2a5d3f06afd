use crate::GIT_COMMIT_HASH;
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Health {
    #[serde(rename = "Status")]
    pub status: String,
}

/// `<name>:<version>:<short commit>` for the `X-App` header.
fn x_app() -> String {
    // "unknown" when built outside git
    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        GIT_COMMIT_HASH.get(0..7).unwrap_or("")
    } else {
        ""
    };

    format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses (
        (status = 200, description = "Service is up", body = Health, content_type = "application/json"),
    ),
    tag = "health"
)]
// axum handler for health, HEAD is served by the same route without a body
pub async fn health() -> impl IntoResponse {
    let headers = x_app()
        .parse::<HeaderValue>()
        .map(|value| {
            debug!("X-App header: {:?}", value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", value);
            headers
        })
        .unwrap_or_else(|err| {
            error!("Failed to parse X-App header: {}", err);
            HeaderMap::new()
        });

    let body = Json(Health {
        status: "OK".to_string(),
    });

    (StatusCode::OK, headers, body)
}
