//! API constants

/// Version segment of every media route
pub const API_VERSION: &str = "v0";

/// Prefix all media routes are mounted under
pub const API_PREFIX: &str = "/api/v0";

/// Where the generated OpenAPI document is served
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";
