//! Data pipeline behind the health-statistics charts.
//!
//! Everything in here is plain data in, plain data out. The egui viewer in
//! `main.rs` is only a consumer of these functions.

pub mod config;
pub mod data;
