//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. The scan path
//! (`record_scan`) inserts the scan row and bumps the denormalized
//! `scans_count` inside one transaction, with the increment expressed in
//! SQL (`scans_count = scans_count + 1`) so concurrent scans never lose an
//! update.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, ExprTrait, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use super::converters::{model_to_qr_code, model_to_scan, model_to_user};
use super::{SeaOrmStorage, is_unique_violation, retry};
use crate::errors::{QrtrackError, Result};
use crate::storage::{QrCode, ScanEvent, ScanRecord, UserProfile};

use migration::entities::{qr_code, scan, user};

impl SeaOrmStorage {
    /// 按 id 插入或刷新用户档案（来自已验证的身份令牌 claims）
    pub async fn upsert_user(
        &self,
        id: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<UserProfile> {
        let db = &self.db;
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email),
            display_name: Set(display_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        retry::with_retry("upsert_user", self.retry_config, || async {
            user::Entity::insert(model.clone())
                .on_conflict(
                    OnConflict::column(user::Column::Id)
                        .update_columns([
                            user::Column::Email,
                            user::Column::DisplayName,
                            user::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(db)
                .await
        })
        .await
        .map_err(|e| QrtrackError::database_operation(format!("写入用户档案失败: {}", e)))?;

        let stored = user::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("回读用户档案失败: {}", e)))?
            .ok_or_else(|| QrtrackError::internal("用户档案写入后不可见"))?;

        Ok(model_to_user(stored))
    }

    /// 插入新二维码
    ///
    /// 返回 `Ok(None)` 表示 slug 撞上唯一索引，调用方应重新生成后重试；
    /// 其余数据库错误原样上抛。
    pub async fn insert_qr_code(
        &self,
        owner_id: &str,
        title: &str,
        destination_url: &str,
        slug: &str,
    ) -> Result<Option<QrCode>> {
        let model = qr_code::ActiveModel {
            user_id: Set(owner_id.to_string()),
            title: Set(title.to_string()),
            destination_url: Set(destination_url.to_string()),
            slug: Set(slug.to_string()),
            scans_count: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => {
                info!("QR code created: id={} slug={}", inserted.id, inserted.slug);
                Ok(Some(model_to_qr_code(inserted)))
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Slug collision on insert: {}", slug);
                Ok(None)
            }
            Err(e) => Err(QrtrackError::database_operation(format!(
                "创建二维码失败: {}",
                e
            ))),
        }
    }

    /// 部分更新 title / destination_url（slug、归属、计数、创建时间不可变）
    ///
    /// 返回 `Ok(None)` 表示 id 不存在或不属于该用户。
    pub async fn update_qr_code(
        &self,
        owner_id: &str,
        id: i32,
        title: Option<String>,
        destination_url: Option<String>,
    ) -> Result<Option<QrCode>> {
        let existing = qr_code::Entity::find_by_id(id)
            .filter(qr_code::Column::UserId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("查询二维码失败: {}", e)))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: qr_code::ActiveModel = existing.into();
        if let Some(title) = title {
            model.title = Set(title);
        }
        if let Some(url) = destination_url {
            model.destination_url = Set(url);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("更新二维码失败: {}", e)))?;

        info!("QR code updated: id={}", updated.id);
        Ok(Some(model_to_qr_code(updated)))
    }

    /// 删除二维码及其全部扫码记录（单事务）
    ///
    /// 外键已声明级联删除，这里仍显式删除 scans，保证在未启用外键
    /// 约束的存储上行为一致。返回 false 表示 id 不存在或不属于该用户。
    pub async fn delete_qr_code(&self, owner_id: &str, id: i32) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QrtrackError::database_operation(format!("开始事务失败: {}", e)))?;

        let existing = qr_code::Entity::find_by_id(id)
            .filter(qr_code::Column::UserId.eq(owner_id))
            .one(&txn)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("查询二维码失败: {}", e)))?;

        if existing.is_none() {
            txn.rollback()
                .await
                .map_err(|e| QrtrackError::database_operation(format!("回滚事务失败: {}", e)))?;
            return Ok(false);
        }

        scan::Entity::delete_many()
            .filter(scan::Column::QrCodeId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("删除扫码记录失败: {}", e)))?;

        qr_code::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| QrtrackError::database_operation(format!("删除二维码失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| QrtrackError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("QR code deleted: id={}", id);
        Ok(true)
    }

    /// 记录一次扫码：插入 scan 行并原子递增 scans_count，同一事务提交
    ///
    /// 计数递增在 SQL 层完成（`scans_count = scans_count + 1`），绝不在
    /// 应用层读改写。二维码在事务中途被删除时整个事务回滚，不留孤儿行。
    pub async fn record_scan(&self, qr_code_id: i32, event: &ScanEvent) -> Result<ScanRecord> {
        let db = &self.db;

        let inserted = retry::with_retry("record_scan", self.retry_config, || async {
            let txn = db.begin().await?;

            let scan_model = scan::ActiveModel {
                qr_code_id: Set(qr_code_id),
                user_agent: Set(event.user_agent.clone()),
                device: Set(event.device.clone()),
                country: Set(event.country.clone()),
                scanned_at: Set(Utc::now()),
                ..Default::default()
            };
            let inserted = scan_model.insert(&txn).await?;

            let update = qr_code::Entity::update_many()
                .col_expr(
                    qr_code::Column::ScansCount,
                    Expr::col(qr_code::Column::ScansCount).add(1),
                )
                .filter(qr_code::Column::Id.eq(qr_code_id))
                .exec(&txn)
                .await?;

            if update.rows_affected == 0 {
                // 二维码已被并发删除，放弃本次记录
                txn.rollback().await?;
                return Err(DbErr::RecordNotFound(format!(
                    "qr_code {} vanished during scan",
                    qr_code_id
                )));
            }

            txn.commit().await?;
            Ok(inserted)
        })
        .await;

        match inserted {
            Ok(model) => Ok(model_to_scan(model)),
            Err(DbErr::RecordNotFound(msg)) => Err(QrtrackError::not_found(msg)),
            Err(e) => Err(QrtrackError::database_operation(format!(
                "记录扫码失败: {}",
                e
            ))),
        }
    }
}
