pub mod auth_middleware;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod money;
pub mod response;
pub mod setting;
