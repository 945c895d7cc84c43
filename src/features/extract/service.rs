use std::time::Instant;

use axum::body::Bytes;
use image::{ColorType, DynamicImage, ImageFormat};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;

use super::acquire::UploadMeta;
use super::metadata;
use super::ocr;
use super::types::{DEVELOPER, ExtractResponse, ImageInfo};

/// 是否运行 OCR（url_inspect 精简服务固定关闭）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    Enabled,
    Disabled,
}

/// 提取主流程：解码 → 图像信息 → EXIF → （可选）OCR → 信封组装。
///
/// 解码与提取都是 CPU 密集操作，整体移入 spawn_blocking 并由
/// `extract_semaphore` 限制并发，避免占满 tokio worker。
/// `started` 由 handler 在请求进入时记录，耗时覆盖完整处理路径。
pub async fn extract(
    state: &AppState,
    bytes: Bytes,
    upload: Option<UploadMeta>,
    mode: OcrMode,
    started: Instant,
) -> Result<ExtractResponse, AppError> {
    let _permit = state
        .extract_semaphore
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| AppError::Internal(format!("获取提取信号量失败: {e}")))?;

    let ocr_config = AppConfig::global().ocr.clone();
    let run_ocr = mode == OcrMode::Enabled && ocr_config.enabled;

    let mut response =
        tokio::task::spawn_blocking(move || -> Result<ExtractResponse, AppError> {
            let format = image::guess_format(&bytes)?;
            let image = image::load_from_memory_with_format(&bytes, format)?;

            let image_info = build_image_info(&image, format, upload.as_ref());
            let metadata = metadata::extract_metadata(&bytes);

            let text_extracted = if run_ocr {
                match ocr::extract_text(&image, &ocr_config.language) {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!("OCR 失败，响应省略 text_extracted: {e}");
                        None
                    }
                }
            } else {
                None
            };

            Ok(ExtractResponse {
                image_info,
                metadata,
                text_extracted,
                response_time_ms: 0.0,
                developer: DEVELOPER.to_string(),
            })
        })
        .await
        .map_err(|e| AppError::Internal(format!("阻塞提取任务执行失败: {e}")))??;

    response.response_time_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
    Ok(response)
}

fn build_image_info(
    image: &DynamicImage,
    format: ImageFormat,
    upload: Option<&UploadMeta>,
) -> ImageInfo {
    ImageInfo {
        format: format_name(format).to_string(),
        mode: mode_name(image.color()).to_string(),
        width: image.width(),
        height: image.height(),
        filename: upload.and_then(|u| u.filename.clone()),
        size_kb: upload.map(|u| round2(u.size_bytes as f64 / 1024.0)),
    }
}

/// 容器格式的对外名称（大写惯用拼法）
fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Pnm => "PNM",
        ImageFormat::Tga => "TGA",
        ImageFormat::Dds => "DDS",
        ImageFormat::Qoi => "QOI",
        ImageFormat::Farbfeld => "FARBFELD",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Hdr => "HDR",
        _ => "UNKNOWN",
    }
}

/// 颜色模式的对外名称（L/LA/RGB/RGBA 系列；16 位与浮点归并到同名通道布局）
fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 | ColorType::La16 => "LA",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA",
        ColorType::L16 => "I;16",
        _ => "RGB",
    }
}

/// 四舍五入到两位小数（耗时与 KB 大小展示用）
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{OcrMode, extract, format_name, mode_name, round2};
    use crate::config::AppConfig;
    use crate::state::AppState;
    use axum::body::Bytes;
    use image::{ColorType, ImageFormat};
    use std::io::Cursor;
    use std::time::Instant;

    #[test]
    fn format_names_use_common_spelling() {
        assert_eq!(format_name(ImageFormat::Png), "PNG");
        assert_eq!(format_name(ImageFormat::Jpeg), "JPEG");
        assert_eq!(format_name(ImageFormat::WebP), "WEBP");
    }

    #[test]
    fn mode_names_follow_channel_layout() {
        assert_eq!(mode_name(ColorType::L8), "L");
        assert_eq!(mode_name(ColorType::Rgb8), "RGB");
        assert_eq!(mode_name(ColorType::Rgba16), "RGBA");
        assert_eq!(mode_name(ColorType::L16), "I;16");
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.005_4), 1.01);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(12.3), 12.3);
    }

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        Bytes::from(bytes)
    }

    #[tokio::test]
    async fn extract_reports_true_dimensions_and_format() {
        let state = AppState::new(AppConfig::global());
        let response = extract(
            &state,
            png_bytes(5, 7),
            None,
            OcrMode::Disabled,
            Instant::now(),
        )
        .await
        .expect("extract");

        assert_eq!(response.image_info.width, 5);
        assert_eq!(response.image_info.height, 7);
        assert_eq!(response.image_info.format, "PNG");
        assert_eq!(response.image_info.mode, "RGB");
        assert!(response.metadata.is_empty());
        assert!(response.text_extracted.is_none());
        assert!(response.response_time_ms >= 0.0);
    }

    #[tokio::test]
    async fn extract_rejects_undecodable_bytes() {
        let state = AppState::new(AppConfig::global());
        let err = extract(
            &state,
            Bytes::from_static(b"not an image"),
            None,
            OcrMode::Disabled,
            Instant::now(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid image data:"));
    }
}
