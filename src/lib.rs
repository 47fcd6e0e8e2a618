//! Authoritative backend for the Метро Империя mini-app.
//!
//! The client only renders; every piece of player progress lives here.
//! Requests authenticate with signed Telegram init data, load the player row,
//! run the lazy economy tick / daily-reward ladder / state merge, and write
//! the row back under a compare-and-swap version guard.

pub mod config;
pub mod db;
pub mod game;
pub mod http;
pub mod metrics;
