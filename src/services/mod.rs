//! Business service layer
//!
//! HTTP handlers stay thin; the actual rules live here.

pub mod qr_service;

pub use qr_service::{CreateQrRequest, QrCodeDetail, QrCodeStats, QrService, UpdateQrRequest};
