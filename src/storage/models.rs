use serde::{Deserialize, Serialize};

/// 可追踪二维码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    pub id: i32,
    pub owner_id: String,
    pub title: String,
    pub destination_url: String,
    pub slug: String,
    pub created_at: chrono::DateTime<chrono::Utc>,

    #[serde(default)]
    pub scans_count: u64,
}

/// 单次扫码事件（只增不改）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: i64,
    pub qr_code_id: i32,
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub country: Option<String>,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

/// 用户档案（来自外部身份提供方的 claims）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的扫码元数据（全部可空，按原样接受）
#[derive(Debug, Clone, Default)]
pub struct ScanEvent {
    pub user_agent: Option<String>,
    pub device: Option<String>,
    pub country: Option<String>,
}
