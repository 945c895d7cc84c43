pub mod acquire;
pub mod handler;
pub mod metadata;
pub mod ocr;
pub mod service;
pub mod types;

pub use handler::create_extract_router;
pub use service::OcrMode;
pub use types::{ExtractResponse, ImageInfo};
