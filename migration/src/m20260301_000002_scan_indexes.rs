//! 扫码日志索引迁移
//!
//! 为 scans 表补充查询索引：
//! - qr_code_id 单列索引（扫码历史查询）
//! - (qr_code_id, scanned_at) 复合索引（单码时间序列查询）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_qr_code_id")
                    .table(Scans::Table)
                    .col(Scans::QrCodeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_code_time")
                    .table(Scans::Table)
                    .col(Scans::QrCodeId)
                    .col(Scans::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_scans_code_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scans_qr_code_id").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scans {
    #[sea_orm(iden = "scans")]
    Table,
    QrCodeId,
    ScannedAt,
}
