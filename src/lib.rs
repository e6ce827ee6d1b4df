pub mod admin;
pub mod args;
pub mod availability;
pub mod catalog;
pub mod config;
pub mod r#const;
pub mod contact;
pub mod error;
pub mod metrics;
pub mod ratelimit;
pub mod server;

pub use crate::metrics::METRICS;
