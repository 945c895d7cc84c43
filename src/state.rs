use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::AppConfig;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 控制并发提取的信号量（图像解码/EXIF/OCR 属 CPU 密集型任务）
    pub extract_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            extract_semaphore: Arc::new(Semaphore::new(config.extract_permits())),
        }
    }
}
