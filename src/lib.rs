pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod retry;
pub mod rules;
pub mod server;
pub mod store;
