use once_cell::sync::OnceCell;
use reqwest::Client;
use std::time::Duration;

use crate::config::AppConfig;

/// 全局复用的 HTTP Client（统一连接池/Keep-Alive），避免每次请求重复创建。
///
/// 说明：
/// - 超时取自 `fetch.timeout_secs`，客户端在首次使用时按配置构建一次；
/// - `Client` 本身是线程安全的，适合全局复用。
static CLIENT_FETCH: OnceCell<Client> = OnceCell::new();

/// 用于外部图片 URL 拉取的 HTTP Client。
pub fn fetch_client() -> Result<&'static Client, reqwest::Error> {
    CLIENT_FETCH.get_or_try_init(|| {
        let fetch = &AppConfig::global().fetch;
        Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .user_agent(concat!("imgext-backend/", env!("CARGO_PKG_VERSION")))
            .build()
    })
}
