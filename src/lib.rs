//! Qrtrack - QR code tracking service
//!
//! This library provides the core functionality for the Qrtrack service:
//! slug-based scan redirects, per-owner QR code management, and scan
//! statistics.
//!
//! # Architecture
//! - `analytics`: Scan aggregation and device classification
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `services`: Business logic shared by HTTP handlers and tests
//! - `storage`: SeaORM storage backend and data access
//! - `system`: Logging and platform utilities

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
