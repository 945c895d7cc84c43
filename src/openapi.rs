use utoipa::OpenApi;

/// 聚合全部对外接口的 OpenAPI 文档（Swagger UI 挂载在 `/docs`）
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::extract::handler::docs_index,
        crate::features::extract::handler::extract_image,
        crate::features::extract::handler::extract_url,
        crate::features::extract::handler::extract_base64,
        crate::features::health::handler::health_check,
    ),
    components(
        schemas(
            crate::error::ErrorBody,
            crate::features::extract::types::ExtractResponse,
            crate::features::extract::types::ImageInfo,
            crate::features::extract::types::UrlExtractRequest,
            crate::features::extract::types::Base64ExtractRequest,
        )
    ),
    tags(
        (name = "Extract", description = "Image metadata & OCR extraction APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Image Metadata & Text Extractor API",
        version = "0.1.0",
        description = "图像元数据与文字提取服务 (Axum)"
    )
)]
pub struct ApiDoc;
