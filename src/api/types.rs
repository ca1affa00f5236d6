//! Wire types for the HTTP API
//!
//! Field names follow the frontend contract (camelCase via serde rename).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::DailyScans;
use crate::storage::{QrCode, ScanRecord, UserProfile};

/// Error response body: `{message}` plus `field` for validation errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorBody {
    pub fn message<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field<M: Into<String>, F: Into<String>>(message: M, field: F) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// QR code row, optionally with its scan history attached
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeResponse {
    pub id: i32,
    pub title: String,
    pub destination_url: String,
    pub slug: String,
    pub scans_count: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scans: Option<Vec<ScanResponse>>,
}

impl QrCodeResponse {
    pub fn from_qr_code(qr: QrCode) -> Self {
        Self {
            id: qr.id,
            title: qr.title,
            destination_url: qr.destination_url,
            slug: qr.slug,
            scans_count: qr.scans_count,
            created_at: qr.created_at,
            scans: None,
        }
    }

    pub fn with_scans(qr: QrCode, scans: Vec<ScanRecord>) -> Self {
        let mut resp = Self::from_qr_code(qr);
        resp.scans = Some(scans.into_iter().map(ScanResponse::from_scan).collect());
        resp
    }
}

/// Single scan record
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub id: i64,
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub country: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResponse {
    pub fn from_scan(scan: ScanRecord) -> Self {
        Self {
            id: scan.id,
            user_agent: scan.user_agent,
            device: scan.device,
            country: scan.country,
            scanned_at: scan.scanned_at,
        }
    }
}

/// Stats response: ordered scan rows plus the per-day roll-up
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub scans: Vec<ScanResponse>,
    pub daily: Vec<DailyScans>,
}

impl StatsResponse {
    pub fn new(scans: Vec<ScanRecord>, daily: Vec<DailyScans>) -> Self {
        Self {
            scans: scans.into_iter().map(ScanResponse::from_scan).collect(),
            daily,
        }
    }
}

/// Current-user response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// POST /api/qrs body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination_url: String,
}

/// PATCH /api/qrs/{id} body (partial)
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQrBody {
    pub title: Option<String>,
    pub destination_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_code_response_camel_case() {
        let qr = QrCode {
            id: 1,
            owner_id: "user-1".to_string(),
            title: "Summer Sale".to_string(),
            destination_url: "https://example.com/sale".to_string(),
            slug: "aB3xY7Qz".to_string(),
            created_at: Utc::now(),
            scans_count: 3,
        };
        let json = serde_json::to_value(QrCodeResponse::from_qr_code(qr)).unwrap();

        assert_eq!(json["destinationUrl"], "https://example.com/sale");
        assert_eq!(json["scansCount"], 3);
        assert!(json.get("scans").is_none());
        assert!(json.get("ownerId").is_none());
    }

    #[test]
    fn test_error_body_field_omitted_when_none() {
        let json = serde_json::to_value(ErrorBody::message("nope")).unwrap();
        assert!(json.get("field").is_none());

        let json = serde_json::to_value(ErrorBody::with_field("Title is required", "title")).unwrap();
        assert_eq!(json["field"], "title");
    }
}
