use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::features::extract::types::DEVELOPER;

/// 应用统一错误类型
///
/// 对外契约固定为 `{error, developer}` 信封：所有"请求可理解但无法处理"
/// 的情况（缺字段、拉取失败、解码失败）一律 400；`Internal` 仅用于
/// 运行时意外故障（阻塞任务被取消等），正常请求路径不会触发。
#[derive(Error, Debug)]
pub enum AppError {
    /// multipart 请求缺少 `image` 字段
    #[error("No image uploaded")]
    MissingImage,

    /// JSON 请求缺少 `url` 字段
    #[error("No URL provided")]
    MissingUrl,

    /// JSON 请求缺少 `base64` 字段
    #[error("No base64 data provided")]
    MissingBase64,

    /// multipart 读取失败
    #[error("Invalid multipart payload: {0}")]
    Multipart(String),

    /// 外部 URL 拉取失败（含超时、非 2xx、响应超限）
    #[error("Image fetch failed: {0}")]
    Fetch(String),

    /// base64 解码失败
    #[error("Base64 decode failed: {0}")]
    Base64Decode(String),

    /// 图像字节无法识别或解码
    #[error("Invalid image data: {0}")]
    ImageDecode(String),

    /// 内部服务器错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 固定的错误响应信封
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 人类可读的错误信息
    #[schema(example = "No image uploaded")]
    pub error: String,
    /// 固定署名字段
    #[schema(example = "t.me/AnshAPi")]
    pub developer: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingImage
            | AppError::MissingUrl
            | AppError::MissingBase64
            | AppError::Multipart(_)
            | AppError::Fetch(_)
            | AppError::Base64Decode(_)
            | AppError::ImageDecode(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("请求处理内部错误: {self}");
        }

        let body = ErrorBody {
            error: self.to_string(),
            developer: DEVELOPER.to_string(),
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::Base64Decode(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageDecode(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::Multipart(err.to_string())
    }
}
