//! Request and response shapes shared by both resources.

use serde::{Deserialize, Serialize};

/// Body returned by a successful create (`201 Created`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedResponse {
    /// The newly allocated identifier.
    pub id: i64,
}

/// `?id=..` query string used by the delete endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// `/page/{page}/size/{size}` path segments.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PagePath {
    pub page: u32,
    pub size: u32,
}
