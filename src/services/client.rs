//! 行情接口 HTTP 客户端

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;

/// 东方财富行情客户端
///
/// 每次调用只发出一次请求，不重试
pub struct MarketClient {
    /// HTTP 客户端
    client: Client,
    /// 日K线接口
    pub(crate) kline_url: Url,
    /// 成交额排名接口
    pub(crate) clist_url: Url,
}

impl MarketClient {
    /// 按配置创建客户端
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let kline_url = parse_endpoint(&config.kline_url)?;
        let clist_url = parse_endpoint(&config.clist_url)?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            kline_url,
            clist_url,
        })
    }

    /// 发出 GET 请求并按类型解析 JSON
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        log::debug!("📡 请求 URL: {} 参数: {:?}", url, params);

        let response = self.client.get(url.clone()).query(params).send().await?;

        if !response.status().is_success() {
            log::warn!("请求 {} 失败: {}", url, response.status());
            return Err(FetchError::Status(response.status()));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Malformed(format!("解析JSON失败: {}", e))
            } else {
                FetchError::Network(e)
            }
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::InvalidRequest(format!("接口地址 {} 无效: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_defaults() {
        let client = MarketClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(client.kline_url.host_str(), Some("push2his.eastmoney.com"));
        assert_eq!(client.clist_url.path(), "/api/qt/clist/get");
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = ApiConfig {
            kline_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        let err = MarketClient::new(&config).err().unwrap();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }
}
