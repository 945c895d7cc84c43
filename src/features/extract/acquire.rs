use axum::body::Bytes;
use axum::extract::Multipart;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::http;

/// 上传文件的附加信息（仅 multipart 通道存在）
#[derive(Debug, Clone)]
pub struct UploadMeta {
    /// 客户端提供的原始文件名
    pub filename: Option<String>,
    /// 上传内容字节数
    pub size_bytes: usize,
}

/// 从 multipart 表单中取出 `image` 字段的字节。
///
/// 表单中没有 `image` 字段时返回 `MissingImage`；其余字段忽略。
pub async fn from_multipart(mut multipart: Multipart) -> Result<(Bytes, UploadMeta), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        let meta = UploadMeta {
            filename,
            size_bytes: bytes.len(),
        };
        return Ok((bytes, meta));
    }
    Err(AppError::MissingImage)
}

/// 从外部 URL 拉取图像字节。
///
/// 走全局复用的 `fetch_client`（超时见 `fetch.timeout_secs`）；
/// 非 2xx 状态与超限响应体都按拉取失败处理。
pub async fn from_url(url: &str) -> Result<Bytes, AppError> {
    let client = http::fetch_client().map_err(|e| AppError::Fetch(e.to_string()))?;
    let response = client.get(url).send().await?.error_for_status()?;

    let max_bytes = AppConfig::global().fetch.max_bytes;
    if let Some(len) = response.content_length()
        && len > max_bytes as u64
    {
        return Err(AppError::Fetch(format!(
            "response body exceeds {max_bytes} bytes"
        )));
    }

    let bytes = response.bytes().await?;
    if bytes.len() > max_bytes {
        return Err(AppError::Fetch(format!(
            "response body exceeds {max_bytes} bytes"
        )));
    }
    Ok(bytes)
}

/// 解码 base64 负载（标准字母表，严格校验）。
pub fn from_base64(data: &str) -> Result<Vec<u8>, AppError> {
    Ok(BASE64_STANDARD.decode(data.trim())?)
}
