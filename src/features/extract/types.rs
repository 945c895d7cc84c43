use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 固定署名字段，出现在所有成功与失败响应中
pub const DEVELOPER: &str = "t.me/AnshAPi";

/// 对外 API 版本字符串（`GET /` 目录中展示）
pub const API_VERSION: &str = "v2.0";

/// `POST /url` 请求体
///
/// `url` 用 Option 承载，字段缺失统一映射为 `No URL provided`，
/// 而不是被 JSON 反序列化拒绝。
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UrlExtractRequest {
    /// 待拉取的图片 URL
    #[schema(example = "https://example.com/photo.jpg")]
    pub url: Option<String>,
}

/// `POST /base64` 请求体
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Base64ExtractRequest {
    /// 标准字母表 base64 编码的图片字节
    pub base64: Option<String>,
}

/// 基础图像信息
///
/// `filename`/`size_kb` 仅在 multipart 上传通道存在。
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageInfo {
    /// 图像容器格式（嗅探结果，如 PNG/JPEG/WEBP）
    #[schema(example = "PNG")]
    pub format: String,
    /// 颜色模式（如 L/LA/RGB/RGBA）
    #[schema(example = "RGB")]
    pub mode: String,
    /// 像素宽度
    pub width: u32,
    /// 像素高度
    pub height: u32,
    /// 上传文件名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// 上传文件大小（KB，保留两位小数）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
}

/// 提取结果信封（成功响应的固定形状）
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExtractResponse {
    /// 基础图像信息
    pub image_info: ImageInfo,
    /// EXIF 元数据映射（可能为空；解析失败时仅含 "error" 键）
    pub metadata: BTreeMap<String, String>,
    /// OCR 识别文本（OCR 关闭或失败时整字段省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_extracted: Option<String>,
    /// 请求处理耗时（毫秒，保留两位小数）
    pub response_time_ms: f64,
    /// 固定署名字段
    #[schema(example = "t.me/AnshAPi")]
    pub developer: String,
}

#[cfg(test)]
mod tests {
    use super::{DEVELOPER, ExtractResponse, ImageInfo};
    use std::collections::BTreeMap;

    fn sample(text: Option<String>) -> ExtractResponse {
        ExtractResponse {
            image_info: ImageInfo {
                format: "PNG".to_string(),
                mode: "RGB".to_string(),
                width: 2,
                height: 3,
                filename: None,
                size_kb: None,
            },
            metadata: BTreeMap::new(),
            text_extracted: text,
            response_time_ms: 1.23,
            developer: DEVELOPER.to_string(),
        }
    }

    #[test]
    fn envelope_uses_snake_case_wire_names() {
        let v = serde_json::to_value(sample(Some("hi".into()))).expect("serialize");
        assert!(v.get("image_info").is_some());
        assert!(v.get("response_time_ms").is_some());
        assert!(v.get("text_extracted").is_some());
        assert_eq!(v["developer"], "t.me/AnshAPi");
        assert_eq!(v["image_info"]["width"], 2);
    }

    #[test]
    fn text_field_is_omitted_when_absent() {
        let v = serde_json::to_value(sample(None)).expect("serialize");
        assert!(v.get("text_extracted").is_none());
    }

    #[test]
    fn upload_only_fields_are_omitted_without_upload() {
        let v = serde_json::to_value(sample(None)).expect("serialize");
        assert!(v["image_info"].get("filename").is_none());
        assert!(v["image_info"].get("size_kb").is_none());
    }
}
