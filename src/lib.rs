pub mod auth;
pub mod http;
pub mod oauth;
pub mod retry;
pub mod runtime;
pub mod tools;
