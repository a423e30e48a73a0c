//! User table library
//!
//! A cache-aside controller for a remotely fetched user list, plus the
//! terminal front-end that drives it.

pub mod app;
pub mod cache;
pub mod cli;
pub mod controller;
pub mod data;
pub mod logging;
pub mod ui;
