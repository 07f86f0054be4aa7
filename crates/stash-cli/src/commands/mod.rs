//! Command handlers

pub mod auth;
pub mod config;
pub mod item;
pub mod share;
pub mod status;
pub mod tag;
