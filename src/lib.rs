//! # Userdir (User Directory Service)
//!
//! `userdir` exposes create, read, update, delete and list operations over a
//! single `users` table in PostgreSQL.
//!
//! ## Resource
//!
//! A user is `{id, name, email}`. The `id` is assigned by the database
//! (`SERIAL`) at insert time and never changes; `email` is unique.
//!
//! ## Error contract
//!
//! Every error leaves the service as JSON `{"error": "<message>"}`:
//!
//! - `400` for a malformed path id or request body.
//! - `404` only when reading a user that does not exist.
//! - `500` for anything the database rejects, carrying the driver message.
//!
//! Updates and deletes of a missing id succeed without touching any row.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
