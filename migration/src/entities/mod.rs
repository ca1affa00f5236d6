pub mod qr_code;
pub mod scan;
pub mod user;

pub use qr_code::Entity as QrCodeEntity;
pub use scan::Entity as ScanEntity;
pub use user::Entity as UserEntity;
