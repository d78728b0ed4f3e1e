//! Middleware modules for the API Gateway

pub mod cors;
pub mod logging;
