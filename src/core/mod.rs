pub mod analysis;
pub mod auth;
pub mod billing;
pub mod config;
pub mod error;
pub mod export;
pub mod formatter;
pub mod models;
pub mod process;
pub mod subscriptions;
