//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations. Everything that
//! serves the authenticated API is scoped by owner id in the query itself,
//! so a foreign id behaves exactly like a missing one.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::error;

use super::converters::{model_to_qr_code, model_to_scan, model_to_user};
use super::{SeaOrmStorage, retry};
use crate::errors::{QrtrackError, Result};
use crate::storage::{QrCode, ScanRecord, UserProfile};

use migration::entities::{qr_code, scan, user};

impl SeaOrmStorage {
    /// 按 id 查询用户
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let db = &self.db;
        let id_owned = user_id.to_string();

        let model = retry::with_retry("get_user", self.retry_config, || async {
            user::Entity::find_by_id(&id_owned).one(db).await
        })
        .await
        .map_err(|e| {
            error!("查询用户失败（重试后仍失败）: {}", e);
            QrtrackError::database_operation(format!("查询用户失败: {}", e))
        })?;

        Ok(model.map(model_to_user))
    }

    /// 加载某用户的全部二维码（创建时间倒序，保证可重复的稳定顺序）
    pub async fn list_qr_codes(&self, owner_id: &str) -> Result<Vec<QrCode>> {
        let db = &self.db;
        let owner = owner_id.to_string();

        let models = retry::with_retry("list_qr_codes", self.retry_config, || async {
            qr_code::Entity::find()
                .filter(qr_code::Column::UserId.eq(&owner))
                .order_by_desc(qr_code::Column::CreatedAt)
                .order_by_desc(qr_code::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| QrtrackError::database_operation(format!("加载二维码列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_qr_code).collect())
    }

    /// 按 id 查询某用户的一个二维码
    pub async fn get_qr_code(&self, owner_id: &str, id: i32) -> Result<Option<QrCode>> {
        let db = &self.db;
        let owner = owner_id.to_string();

        let model = retry::with_retry(&format!("get_qr_code({})", id), self.retry_config, || async {
            qr_code::Entity::find_by_id(id)
                .filter(qr_code::Column::UserId.eq(&owner))
                .one(db)
                .await
        })
        .await
        .map_err(|e| QrtrackError::database_operation(format!("查询二维码失败: {}", e)))?;

        Ok(model.map(model_to_qr_code))
    }

    /// 查询二维码及其全部扫码历史（scanned_at 倒序）
    pub async fn get_qr_code_with_scans(
        &self,
        owner_id: &str,
        id: i32,
    ) -> Result<Option<(QrCode, Vec<ScanRecord>)>> {
        let Some(qr) = self.get_qr_code(owner_id, id).await? else {
            return Ok(None);
        };

        let scans = self.list_scans(qr.id).await?;
        Ok(Some((qr, scans)))
    }

    /// 扫码历史（scanned_at 倒序，同刻按 id 倒序保证稳定）
    pub async fn list_scans(&self, qr_code_id: i32) -> Result<Vec<ScanRecord>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("list_scans({})", qr_code_id),
            self.retry_config,
            || async {
                scan::Entity::find()
                    .filter(scan::Column::QrCodeId.eq(qr_code_id))
                    .order_by_desc(scan::Column::ScannedAt)
                    .order_by_desc(scan::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| QrtrackError::database_operation(format!("加载扫码历史失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_scan).collect())
    }

    /// 按 slug 精确查询（大小写敏感，公共跳转路径使用）
    pub async fn resolve_slug(&self, slug: &str) -> Result<Option<QrCode>> {
        let db = &self.db;
        let slug_owned = slug.to_string();

        let model = retry::with_retry("resolve_slug", self.retry_config, || async {
            qr_code::Entity::find()
                .filter(qr_code::Column::Slug.eq(&slug_owned))
                .one(db)
                .await
        })
        .await
        .map_err(|e| QrtrackError::database_operation(format!("slug 查询失败: {}", e)))?;

        // eq 即为精确匹配：SQLite / PostgreSQL 默认二进制比较，
        // MySQL 上 slug 列在迁移里声明了 utf8mb4_bin 排序规则
        Ok(model.map(model_to_qr_code))
    }
}
