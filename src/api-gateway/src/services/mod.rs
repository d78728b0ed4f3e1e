//! Outbound clients for the backend and the hosting platform

pub mod backend;
pub mod hosting;
