//! HTTP services and middleware

pub mod helpers;
pub mod jwt;
pub mod middleware;
pub mod services;
pub mod types;
