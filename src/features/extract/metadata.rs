use std::collections::BTreeMap;
use std::io::Cursor;

use exif::In;

/// 提取 EXIF 元数据映射。
///
/// 永不失败：没有 EXIF 块时返回空映射；容器解析出错时以单个
/// "error" 键承载错误信息，由调用方原样放进响应。
/// 标签名来自 EXIF 标签表（数字 ID → 可读名称）。
pub fn extract_metadata(bytes: &[u8]) -> BTreeMap<String, String> {
    let mut cursor = Cursor::new(bytes);
    match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(data) => data
            .fields()
            .filter(|field| field.ifd_num == In::PRIMARY)
            .map(|field| {
                (
                    field.tag.to_string(),
                    field.display_value().to_string(),
                )
            })
            .collect(),
        Err(exif::Error::NotFound(_)) => BTreeMap::new(),
        Err(e) => BTreeMap::from([("error".to_string(), e.to_string())]),
    }
}
