pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{QrCode, ScanEvent, ScanRecord, UserProfile};

use std::sync::Arc;
use tracing::info;

use crate::errors::Result;

/// 存储工厂：按配置中的 database_url 选择后端并完成初始化
pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let database_url = crate::config::get_config().database.database_url.clone();
        let backend = backend::infer_backend_from_url(&database_url)?;
        info!("Initializing {} storage backend", backend);
        let storage = SeaOrmStorage::new(&database_url, &backend).await?;
        Ok(Arc::new(storage))
    }
}
