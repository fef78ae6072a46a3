//! Tire telemetry core for fleet tracking.
//!
//! Resolves telemetry devices to cars and drivers, stores tire samples and GPS
//! fixes, aggregates out-of-bounds reports, and turns field breakage reports
//! into operator notifications. Presentation layers build a [`common::Services`]
//! bundle over a [`store::PgStore`].

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
