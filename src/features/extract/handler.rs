use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

use super::acquire;
use super::service::{self, OcrMode};
use super::types::{API_VERSION, Base64ExtractRequest, DEVELOPER, ExtractResponse, UrlExtractRequest};

/// 构建提取相关路由（三条输入通道）
pub fn create_extract_router() -> Router<AppState> {
    Router::new()
        .route("/image", post(extract_image))
        .route("/url", post(extract_url))
        .route("/base64", post(extract_base64))
}

#[utoipa::path(
    get,
    path = "/",
    summary = "API 目录",
    description = "列出可用路由与版本信息。",
    responses((status = 200, description = "路由目录", body = serde_json::Value)),
    tag = "Extract"
)]
pub async fn docs_index() -> Json<serde_json::Value> {
    Json(json!({
        "API": "Image Metadata & Text Extractor",
        "routes": {
            "/": "Show API docs",
            "/image": "POST image file (form-data) → metadata + OCR text + info",
            "/url": "POST JSON { 'url': 'http://...jpg' } → same",
            "/base64": "POST JSON { 'base64': '...' } → same"
        },
        "developer": DEVELOPER,
        "version": API_VERSION
    }))
}

#[utoipa::path(
    post,
    path = "/image",
    summary = "从上传文件提取",
    description = "multipart 表单的 `image` 字段携带图片文件；返回图像信息、EXIF 元数据与 OCR 文本。",
    responses(
        (status = 200, description = "提取结果", body = ExtractResponse),
        (status = 400, description = "缺少 image 字段或图片无法解码", body = crate::error::ErrorBody)
    ),
    tag = "Extract"
)]
pub async fn extract_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let started = Instant::now();
    let (bytes, meta) = acquire::from_multipart(multipart).await?;
    let response = service::extract(&state, bytes, Some(meta), OcrMode::Enabled, started).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/url",
    summary = "从 URL 提取",
    description = "服务端拉取 `url` 指向的图片后提取；拉取失败（超时/非 2xx/超限）返回 400。",
    request_body = UrlExtractRequest,
    responses(
        (status = 200, description = "提取结果", body = ExtractResponse),
        (status = 400, description = "缺少 url 字段、拉取失败或图片无法解码", body = crate::error::ErrorBody)
    ),
    tag = "Extract"
)]
pub async fn extract_url(
    State(state): State<AppState>,
    Json(req): Json<UrlExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let started = Instant::now();
    let url = req
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(AppError::MissingUrl)?;
    let bytes = acquire::from_url(url).await?;
    let response = service::extract(&state, bytes, None, OcrMode::Enabled, started).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/base64",
    summary = "从 base64 负载提取",
    description = "`base64` 字段携带标准字母表编码的图片字节；解码失败返回 400。",
    request_body = Base64ExtractRequest,
    responses(
        (status = 200, description = "提取结果", body = ExtractResponse),
        (status = 400, description = "缺少 base64 字段、解码失败或图片无法解码", body = crate::error::ErrorBody)
    ),
    tag = "Extract"
)]
pub async fn extract_base64(
    State(state): State<AppState>,
    Json(req): Json<Base64ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let started = Instant::now();
    let data = req.base64.as_deref().ok_or(AppError::MissingBase64)?;
    let bytes = acquire::from_base64(data)?;
    let response = service::extract(
        &state,
        axum::body::Bytes::from(bytes),
        None,
        OcrMode::Enabled,
        started,
    )
    .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::docs_index;
    use axum::Json;

    #[tokio::test]
    async fn docs_index_lists_all_routes() {
        let Json(v) = docs_index().await;
        assert_eq!(v["API"], "Image Metadata & Text Extractor");
        assert_eq!(v["version"], "v2.0");
        assert_eq!(v["developer"], "t.me/AnshAPi");
        for route in ["/", "/image", "/url", "/base64"] {
            assert!(v["routes"].get(route).is_some(), "missing route {route}");
        }
    }
}
