//! Scan entity, one row per resolved redirect

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "scans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub qr_code_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    /// Coarse device category parsed from the user agent
    pub device: Option<String>,
    /// Country code (ISO 3166-1 alpha-2), taken from edge headers as given
    pub country: Option<String>,
    pub scanned_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_code::Entity",
        from = "Column::QrCodeId",
        to = "super::qr_code::Column::Id"
    )]
    QrCode,
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
