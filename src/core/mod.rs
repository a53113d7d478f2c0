//! Core types shared by every translation service

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod request_counter;
