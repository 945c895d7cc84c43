use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

/// 契约关键点：错误响应固定为 `{error, developer}` 信封，缺输入一律 400。
#[tokio::test]
async fn app_error_into_response_is_fixed_envelope() {
    let resp = imgext_backend::AppError::MissingUrl.into_response();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("missing Content-Type")
        .to_str()
        .expect("invalid Content-Type");
    assert!(content_type.starts_with("application/json"));

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let v: serde_json::Value = serde_json::from_slice(&bytes).expect("parse json");

    // 核心字段（强一致契约）
    assert_eq!(v["error"], "No URL provided");
    assert_eq!(v["developer"], "t.me/AnshAPi");
    assert_eq!(v.as_object().map(|o| o.len()), Some(2));
}

/// 契约关键点：成功信封字段名固定 snake_case，上传/OCR 相关字段按需省略。
#[test]
fn extract_response_wire_shape() {
    use imgext_backend::features::extract::types::{ExtractResponse, ImageInfo};
    use std::collections::BTreeMap;

    let resp = ExtractResponse {
        image_info: ImageInfo {
            format: "JPEG".to_string(),
            mode: "RGB".to_string(),
            width: 640,
            height: 480,
            filename: Some("photo.jpg".to_string()),
            size_kb: Some(12.34),
        },
        metadata: BTreeMap::from([("Make".to_string(), "ACME".to_string())]),
        text_extracted: None,
        response_time_ms: 4.56,
        developer: "t.me/AnshAPi".to_string(),
    };

    let v = serde_json::to_value(resp).expect("serialize json");

    assert_eq!(v["image_info"]["format"], "JPEG");
    assert_eq!(v["image_info"]["filename"], "photo.jpg");
    assert_eq!(v["image_info"]["size_kb"], 12.34);
    assert_eq!(v["metadata"]["Make"], "ACME");
    assert_eq!(v["response_time_ms"], 4.56);
    assert_eq!(v["developer"], "t.me/AnshAPi");
    // OCR 未运行时整字段省略，而不是 null
    assert!(v.get("text_extracted").is_none());
}
