//! Authentication for the media routes

pub mod middleware;
