use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// 日志格式
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
    fn default_format() -> String {
        "full".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default)]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub allowed_headers: Vec<String>,
}

/// 外部 URL 拉取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// 拉取超时（秒）。无超时的拉取会被恶意 URL 无限挂起 worker。
    #[serde(default = "FetchConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// 响应体大小上限（字节）
    #[serde(default = "FetchConfig::default_max_bytes")]
    pub max_bytes: usize,
}

impl FetchConfig {
    fn default_timeout_secs() -> u64 {
        30
    }
    fn default_max_bytes() -> usize {
        32 * 1024 * 1024
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            max_bytes: Self::default_max_bytes(),
        }
    }
}

/// OCR 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// 是否启用 OCR（关闭后响应省略 text_extracted 字段）
    #[serde(default = "OcrConfig::default_enabled")]
    pub enabled: bool,
    /// Tesseract 语言包
    #[serde(default = "OcrConfig::default_language")]
    pub language: String,
    /// 并发提取许可数（0=自动，取 CPU 核心数）
    #[serde(default)]
    pub max_parallel: u32,
}

impl OcrConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_language() -> String {
        "eng".to_string()
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            language: Self::default_language(),
            max_parallel: 0,
        }
    }
}

/// 请求体大小限制
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// 请求体上限（字节），同时约束 multipart 与 JSON 负载
    #[serde(default = "LimitsConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl LimitsConfig {
    fn default_max_body_bytes() -> usize {
        32 * 1024 * 1024
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: Self::default_max_body_bytes(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 外部 URL 拉取配置
    #[serde(default)]
    pub fetch: FetchConfig,
    /// OCR 配置
    #[serde(default)]
    pub ocr: OcrConfig,
    /// 请求体大小限制
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖
    ///
    /// `config.toml` 可缺省：所有字段都有默认值，缺文件时等价于默认配置。
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            // 加载配置文件（可选）
            .add_source(File::with_name("config").required(false))
            // 支持环境变量覆盖，例如：APP_SERVER_PORT
            .add_source(
                Environment::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 获取全局配置单例
    ///
    /// 未经 `init_global()` 初始化时回退为默认配置（测试场景依赖该行为）。
    pub fn global() -> &'static AppConfig {
        CONFIG.get_or_init(AppConfig::default)
    }

    /// 初始化全局配置
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 并发提取许可数（0=自动，取 CPU 核心数）
    pub fn extract_permits(&self) -> usize {
        let m = self.ocr.max_parallel as usize;
        if m == 0 { num_cpus::get() } else { m }
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn default_listen_addr_and_toggles() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server_addr(), "0.0.0.0:8000");
        assert!(cfg.ocr.enabled);
        assert_eq!(cfg.ocr.language, "eng");
        assert_eq!(cfg.fetch.timeout_secs, 30);
        assert!(!cfg.cors.enabled);
    }

    #[test]
    fn extract_permits_auto_uses_cpu_count() {
        let mut cfg = AppConfig::default();
        cfg.ocr.max_parallel = 0;
        assert!(cfg.extract_permits() >= 1);
        cfg.ocr.max_parallel = 3;
        assert_eq!(cfg.extract_permits(), 3);
    }
}
