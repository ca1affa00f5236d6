//! QR code management service
//!
//! Provides unified business logic for QR code operations, shared between
//! HTTP handlers and tests. All operations are scoped to the calling owner.

use std::sync::Arc;

use tracing::{info, warn};

use crate::analytics::{DailyScans, aggregate_scans};
use crate::errors::{QrtrackError, Result};
use crate::storage::{QrCode, ScanRecord, SeaOrmStorage};
use crate::utils::url_validator::validate_url;
use crate::utils::{DEFAULT_SLUG_LENGTH, generate_random_slug};

/// slug 碰撞时的最大重新生成次数
const MAX_SLUG_ATTEMPTS: u32 = 5;

/// 标题最大长度（与原始数据库 schema 对齐）
const MAX_TITLE_LENGTH: usize = 255;

// ============ Request DTOs ============

/// Request to create a new QR code
#[derive(Debug, Clone)]
pub struct CreateQrRequest {
    pub title: String,
    pub destination_url: String,
}

/// Request to update an existing QR code (partial, both fields optional)
#[derive(Debug, Clone, Default)]
pub struct UpdateQrRequest {
    pub title: Option<String>,
    pub destination_url: Option<String>,
}

/// A QR code together with its full scan history
#[derive(Debug, Clone)]
pub struct QrCodeDetail {
    pub qr_code: QrCode,
    pub scans: Vec<ScanRecord>,
}

/// Scan statistics for one QR code: the ordered rows plus a per-day summary
#[derive(Debug, Clone)]
pub struct QrCodeStats {
    pub scans: Vec<ScanRecord>,
    pub daily: Vec<DailyScans>,
}

// ============ QrService Implementation ============

/// Service for QR code CRUD and statistics
pub struct QrService {
    storage: Arc<SeaOrmStorage>,
}

impl QrService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 校验标题：去除首尾空白后非空、不超长
    fn validate_title(title: &str) -> Result<String> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(QrtrackError::validation("title", "Title is required"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(QrtrackError::validation("title", "Title is too long"));
        }
        Ok(trimmed.to_string())
    }

    /// 校验目标 URL（http/https，拒绝危险协议）
    fn validate_destination(url: &str) -> Result<String> {
        let trimmed = url.trim();
        validate_url(trimmed)
            .map_err(|e| QrtrackError::validation("destinationUrl", e.to_string()))?;
        Ok(trimmed.to_string())
    }

    // ============ CRUD Operations ============

    /// Create a new QR code with a freshly generated slug
    ///
    /// slug 由服务端生成，碰撞时换一个再试，有限次后放弃。
    pub async fn create_qr_code(&self, owner_id: &str, req: CreateQrRequest) -> Result<QrCode> {
        let title = Self::validate_title(&req.title)?;
        let destination_url = Self::validate_destination(&req.destination_url)?;

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = generate_random_slug(DEFAULT_SLUG_LENGTH);
            match self
                .storage
                .insert_qr_code(owner_id, &title, &destination_url, &slug)
                .await?
            {
                Some(created) => {
                    info!("Created QR code '{}' for user {}", created.slug, owner_id);
                    return Ok(created);
                }
                None => {
                    warn!(
                        "Slug collision (attempt {}/{}), regenerating",
                        attempt, MAX_SLUG_ATTEMPTS
                    );
                }
            }
        }

        Err(QrtrackError::slug_exhausted(format!(
            "Failed to generate a unique slug after {} attempts",
            MAX_SLUG_ATTEMPTS
        )))
    }

    /// List all QR codes owned by this user, newest first
    pub async fn list_qr_codes(&self, owner_id: &str) -> Result<Vec<QrCode>> {
        self.storage.list_qr_codes(owner_id).await
    }

    /// Get one QR code with its full scan history
    pub async fn get_qr_code(&self, owner_id: &str, id: i32) -> Result<QrCodeDetail> {
        let (qr_code, scans) = self
            .storage
            .get_qr_code_with_scans(owner_id, id)
            .await?
            .ok_or_else(|| QrtrackError::not_found("QR code not found"))?;
        Ok(QrCodeDetail { qr_code, scans })
    }

    /// Partially update title and/or destination URL
    ///
    /// slug、归属、计数、创建时间不可通过更新修改。
    pub async fn update_qr_code(
        &self,
        owner_id: &str,
        id: i32,
        req: UpdateQrRequest,
    ) -> Result<QrCode> {
        let title = match req.title {
            Some(t) => Some(Self::validate_title(&t)?),
            None => None,
        };
        let destination_url = match req.destination_url {
            Some(u) => Some(Self::validate_destination(&u)?),
            None => None,
        };

        self.storage
            .update_qr_code(owner_id, id, title, destination_url)
            .await?
            .ok_or_else(|| QrtrackError::not_found("QR code not found"))
    }

    /// Delete a QR code and all of its scan records
    pub async fn delete_qr_code(&self, owner_id: &str, id: i32) -> Result<()> {
        if !self.storage.delete_qr_code(owner_id, id).await? {
            return Err(QrtrackError::not_found("QR code not found"));
        }
        Ok(())
    }

    /// Scan history for one QR code with its per-day roll-up
    pub async fn qr_code_stats(&self, owner_id: &str, id: i32) -> Result<QrCodeStats> {
        let (qr_code, scans) = self
            .storage
            .get_qr_code_with_scans(owner_id, id)
            .await?
            .ok_or_else(|| QrtrackError::not_found("QR code not found"))?;

        let daily = aggregate_scans(&scans);
        info!(
            "QR {} stats: {} scans across {} active days",
            qr_code.id,
            scans.len(),
            daily.len()
        );
        Ok(QrCodeStats { scans, daily })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_trims() {
        assert_eq!(QrService::validate_title("  Summer Sale  ").unwrap(), "Summer Sale");
    }

    #[test]
    fn test_validate_title_rejects_empty() {
        let err = QrService::validate_title("   ").unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_validate_title_rejects_overlong() {
        let err = QrService::validate_title(&"x".repeat(300)).unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_validate_destination_rejects_garbage() {
        let err = QrService::validate_destination("not-a-url").unwrap_err();
        assert_eq!(err.field(), Some("destinationUrl"));
    }

    #[test]
    fn test_validate_destination_rejects_javascript() {
        assert!(QrService::validate_destination("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_validate_destination_accepts_https() {
        assert_eq!(
            QrService::validate_destination(" https://example.com/sale ").unwrap(),
            "https://example.com/sale"
        );
    }
}
