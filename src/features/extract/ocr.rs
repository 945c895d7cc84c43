//! OCR 文字提取
//!
//! Tesseract（经 leptess 绑定）封装。`ocr` feature 关闭时提供同签名的
//! 降级实现，调用方按失败路径处理（省略 text_extracted 字段）。

use image::DynamicImage;
use thiserror::Error;

/// OCR 失败的内部错误类型
///
/// 失败不会中断请求：调用方记录告警并在响应中省略文本字段。
#[derive(Error, Debug)]
pub enum OcrError {
    /// 引擎初始化失败（常见于系统未安装 Tesseract 或语言包缺失）
    #[error("OCR 引擎初始化失败: {0}")]
    Init(String),

    /// 图像载入引擎失败
    #[error("图像载入 OCR 引擎失败: {0}")]
    Image(String),

    /// 识别阶段失败
    #[error("文字识别失败: {0}")]
    Text(String),

    /// OCR 支持未编译进当前二进制
    #[error("OCR 支持未编译（缺少 `ocr` feature）")]
    Unavailable,
}

/// 对解码后的图像执行 OCR，返回去除首尾空白的识别文本。
///
/// 图像统一重编码为 PNG 再交给引擎，屏蔽引擎对原始容器格式的支持差异。
#[cfg(feature = "ocr")]
pub fn extract_text(image: &DynamicImage, language: &str) -> Result<String, OcrError> {
    use leptess::LepTess;
    use std::io::Cursor;

    let mut engine = LepTess::new(None, language).map_err(|e| OcrError::Init(e.to_string()))?;

    let mut png_bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| OcrError::Image(e.to_string()))?;
    engine
        .set_image_from_mem(&png_bytes)
        .map_err(|e| OcrError::Image(e.to_string()))?;

    let text = engine
        .get_utf8_text()
        .map_err(|e| OcrError::Text(e.to_string()))?;
    Ok(text.trim().to_string())
}

#[cfg(not(feature = "ocr"))]
pub fn extract_text(_image: &DynamicImage, _language: &str) -> Result<String, OcrError> {
    Err(OcrError::Unavailable)
}

#[cfg(all(test, feature = "ocr"))]
mod tests {
    use super::extract_text;
    use image::{DynamicImage, RgbImage};

    /// 纯色图不包含文字；环境未安装 Tesseract 时初始化失败也可接受。
    #[test]
    fn blank_image_yields_empty_text_or_init_error() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([255, 255, 255])));
        match extract_text(&img, "eng") {
            Ok(text) => assert!(text.is_empty()),
            Err(e) => {
                let msg = e.to_string();
                assert!(!msg.is_empty());
            }
        }
    }

    #[test]
    fn result_is_trimmed() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, image::Rgb([0, 0, 0])));
        if let Ok(text) = extract_text(&img, "eng") {
            assert_eq!(text, text.trim());
        }
    }
}
