//! HTTP layer for the burnout risk engine

pub mod api;
pub mod config;
pub mod page;
