use crate::storage::{QrCode, ScanRecord, UserProfile};
use migration::entities::{qr_code, scan, user};

/// 将 Sea-ORM Model 转换为 QrCode
pub fn model_to_qr_code(model: qr_code::Model) -> QrCode {
    QrCode {
        id: model.id,
        owner_id: model.user_id,
        title: model.title,
        destination_url: model.destination_url,
        slug: model.slug,
        created_at: model.created_at,
        scans_count: model.scans_count.max(0) as u64,
    }
}

/// 将 Sea-ORM Model 转换为 ScanRecord
pub fn model_to_scan(model: scan::Model) -> ScanRecord {
    ScanRecord {
        id: model.id,
        qr_code_id: model.qr_code_id,
        user_agent: model.user_agent,
        device: model.device,
        country: model.country,
        scanned_at: model.scanned_at,
    }
}

/// 将 Sea-ORM Model 转换为 UserProfile
pub fn model_to_user(model: user::Model) -> UserProfile {
    UserProfile {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
