//! Core library for the `wxarchive` pipeline.
//!
//! This crate defines:
//! - Configuration and API-key handling
//! - The OpenWeatherMap One Call client
//! - Fetch orchestration with on-disk persistence
//! - The hourly temperature transform
//!
//! It is used by `wxarchive-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod fetch;
pub mod model;
pub mod transform;

pub use client::{ClientError, CurrentOptions, DaySummarySource, OpenWeatherClient};
pub use config::Config;
pub use fetch::FetchMode;
pub use model::{HourlyTemp, Location, OneCallResponse};
