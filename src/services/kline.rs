//! 日K线数据获取
//!
//! 对接东方财富 push2his K线接口，每条K线为逗号分隔字符串：
//! `日期,开盘,收盘,最高,最低,成交量,成交额,振幅,涨跌幅,涨跌额,换手率`

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::FetchError;
use crate::models::{DailyQuote, SecId};

use super::client::MarketClient;
use super::common::{
    parse_number, KLINE_ADJUST, KLINE_END_SENTINEL, KLINE_FIELDS1, KLINE_FIELDS2,
    KLINE_PERIOD_DAILY, KLINE_UT,
};

/// 每条K线的字段数
const KLINE_FIELD_COUNT: usize = 11;

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Option<Vec<String>>,
}

impl MarketClient {
    /// 获取日K线，按日期从旧到新返回至多 `limit` 条
    pub async fn fetch_daily_quotes(
        &self,
        secid: &SecId,
        limit: usize,
    ) -> Result<Vec<DailyQuote>, FetchError> {
        if limit == 0 {
            return Err(FetchError::InvalidRequest("记录数必须为正整数".to_string()));
        }

        let params = [
            ("secid", secid.to_string()),
            ("ut", KLINE_UT.to_string()),
            ("fields1", KLINE_FIELDS1.to_string()),
            ("fields2", KLINE_FIELDS2.to_string()),
            ("klt", KLINE_PERIOD_DAILY.to_string()),
            ("fqt", KLINE_ADJUST.to_string()),
            ("end", KLINE_END_SENTINEL.to_string()),
            ("lmt", limit.to_string()),
        ];

        let response: KlineResponse = self.get_json(&self.kline_url, &params).await?;

        let klines = response
            .data
            .and_then(|d| d.klines)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FetchError::Empty(format!("{} 无K线数据", secid)))?;

        let mut quotes = parse_klines(&klines)?;
        if quotes.len() > limit {
            quotes.drain(..quotes.len() - limit);
        }

        log::debug!("📈 {} 解析到 {} 条K线数据", secid, quotes.len());
        Ok(quotes)
    }
}

/// 解析K线字符串列表，结果按日期升序
pub fn parse_klines(lines: &[String]) -> Result<Vec<DailyQuote>, FetchError> {
    let mut quotes = lines
        .iter()
        .map(|line| parse_kline_line(line))
        .collect::<Result<Vec<_>, _>>()?;
    quotes.sort_by_key(|q| q.date);
    Ok(quotes)
}

fn parse_kline_line(line: &str) -> Result<DailyQuote, FetchError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != KLINE_FIELD_COUNT {
        return Err(FetchError::Malformed(format!(
            "K线字段数应为 {}，实际为 {}: {}",
            KLINE_FIELD_COUNT,
            fields.len(),
            line
        )));
    }

    let date = NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d")
        .map_err(|e| FetchError::Malformed(format!("日期 {} 无法解析: {}", fields[0], e)))?;

    Ok(DailyQuote {
        date,
        open: parse_number(fields[1]),
        close: parse_number(fields[2]),
        high: parse_number(fields[3]),
        low: parse_number(fields[4]),
        volume: parse_number(fields[5]),
        turnover: parse_number(fields[6]),
        amplitude: parse_number(fields[7]),
        change_pct: parse_number(fields[8]),
        change_amount: parse_number(fields[9]),
        turnover_rate: parse_number(fields[10]),
    })
}
