//! 日K线数据模型
//!
//! 定义证券标识和单日行情记录

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// 东方财富市场编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    /// 深市（含北交所指数）
    Shenzhen,
    /// 沪市
    Shanghai,
}

impl Market {
    /// secid 中的市场前缀
    pub fn prefix(self) -> u8 {
        match self {
            Market::Shenzhen => 0,
            Market::Shanghai => 1,
        }
    }
}

/// 证券标识，形如 `1.600000`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecId {
    /// 市场
    pub market: Market,
    /// 6 位证券代码
    pub code: String,
}

impl SecId {
    /// 按代码推断市场：6 开头归沪市，其余归深市
    pub fn from_code(code: &str) -> Result<Self, FetchError> {
        validate_code(code)?;
        let market = if code.starts_with('6') {
            Market::Shanghai
        } else {
            Market::Shenzhen
        };
        Ok(Self {
            market,
            code: code.to_string(),
        })
    }
}

fn validate_code(code: &str) -> Result<(), FetchError> {
    if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FetchError::InvalidRequest(format!("无效的证券代码: {}", code)))
    }
}

impl FromStr for SecId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, code)) = s.split_once('.') else {
            return SecId::from_code(s);
        };
        let market = match prefix {
            "0" => Market::Shenzhen,
            "1" => Market::Shanghai,
            _ => {
                return Err(FetchError::InvalidRequest(format!(
                    "无效的市场前缀: {}",
                    s
                )))
            }
        };
        validate_code(code)?;
        Ok(Self {
            market,
            code: code.to_string(),
        })
    }
}

impl fmt::Display for SecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.market.prefix(), self.code)
    }
}

/// 单日K线记录
///
/// 数值字段解析失败时记为 `None`，不影响整条记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    /// 交易日
    pub date: NaiveDate,
    /// 开盘价
    pub open: Option<f64>,
    /// 收盘价
    pub close: Option<f64>,
    /// 最高价
    pub high: Option<f64>,
    /// 最低价
    pub low: Option<f64>,
    /// 成交量
    pub volume: Option<f64>,
    /// 成交额（元）
    pub turnover: Option<f64>,
    /// 振幅
    pub amplitude: Option<f64>,
    /// 涨跌幅（百分比）
    pub change_pct: Option<f64>,
    /// 涨跌额
    pub change_amount: Option<f64>,
    /// 换手率
    pub turnover_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secid_from_code() {
        assert_eq!(SecId::from_code("600519").unwrap().to_string(), "1.600519");
        assert_eq!(SecId::from_code("000001").unwrap().to_string(), "0.000001");
        assert_eq!(SecId::from_code("899050").unwrap().to_string(), "0.899050");
        assert!(SecId::from_code("60051").is_err());
        assert!(SecId::from_code("abcdef").is_err());
    }

    #[test]
    fn test_secid_parse_explicit_market() {
        let sh_index: SecId = "1.000001".parse().unwrap();
        assert_eq!(sh_index.market, Market::Shanghai);
        assert_eq!(sh_index.code, "000001");

        // 未带前缀时按代码推断
        let bare: SecId = "601318".parse().unwrap();
        assert_eq!(bare.market, Market::Shanghai);

        assert!("2.000001".parse::<SecId>().is_err());
        assert!("1.00001".parse::<SecId>().is_err());
    }
}
