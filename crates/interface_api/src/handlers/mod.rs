//! Request handlers

pub mod health;
pub mod config;
pub mod fx;
pub mod ihs;
pub mod report;
