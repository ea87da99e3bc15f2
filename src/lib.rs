pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod session;
pub mod startup;
pub mod ui;
