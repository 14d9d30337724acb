pub mod app;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod tools;
