//! 初始表迁移
//!
//! 创建 users / qr_codes / scans 三张表：
//! - users: 外部身份提供方的用户档案
//! - qr_codes: 可追踪二维码（slug 全局唯一）
//! - scans: 扫码事件日志（归属 qr_codes，级联删除）

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // 创建 users 表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // slug 匹配必须区分大小写。SQLite / PostgreSQL 的默认比较本身是
        // 二进制的，MySQL/MariaDB 的默认 *_ci 排序规则会让查找和唯一索引
        // 都不区分大小写，这里显式改用二进制排序规则。
        let mut slug_col = ColumnDef::new(QrCodes::Slug)
            .string_len(64)
            .not_null()
            .unique_key()
            .to_owned();
        if backend == DatabaseBackend::MySql {
            slug_col.extra("COLLATE utf8mb4_bin");
        }

        // 创建 qr_codes 表
        manager
            .create_table(
                Table::create()
                    .table(QrCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrCodes::UserId).string().not_null())
                    .col(ColumnDef::new(QrCodes::Title).text().not_null())
                    .col(ColumnDef::new(QrCodes::DestinationUrl).text().not_null())
                    .col(&mut slug_col)
                    .col(
                        ColumnDef::new(QrCodes::ScansCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QrCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_qr_codes_user_id")
                            .from(QrCodes::Table, QrCodes::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 scans 表
        manager
            .create_table(
                Table::create()
                    .table(Scans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scans::QrCodeId).integer().not_null())
                    .col(ColumnDef::new(Scans::UserAgent).text().null())
                    .col(ColumnDef::new(Scans::Device).string_len(32).null())
                    .col(ColumnDef::new(Scans::Country).string_len(2).null())
                    .col(
                        ColumnDef::new(Scans::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_qr_code_id")
                            .from(Scans::Table, Scans::QrCodeId)
                            .to(QrCodes::Table, QrCodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 qr_codes 所有者索引（用于 List 查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_user_id")
                    .table(QrCodes::Table)
                    .col(QrCodes::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除索引
        manager
            .drop_index(Index::drop().name("idx_qr_codes_user_id").to_owned())
            .await?;

        // 按依赖顺序删除表
        manager
            .drop_table(Table::drop().table(Scans::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QrCodes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    DisplayName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QrCodes {
    #[sea_orm(iden = "qr_codes")]
    Table,
    Id,
    UserId,
    Title,
    DestinationUrl,
    Slug,
    ScansCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Scans {
    #[sea_orm(iden = "scans")]
    Table,
    Id,
    QrCodeId,
    UserAgent,
    Device,
    Country,
    ScannedAt,
}
