/// 图像元数据与文字提取
pub mod extract;

/// 健康检查
pub mod health;
