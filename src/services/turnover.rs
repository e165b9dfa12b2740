//! 沪深北三市成交额汇总

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::FetchError;
use crate::models::{DailyQuote, SecId, Sentiment, TurnoverRow};

use super::client::MarketClient;
use super::common::{round2, YI};

/// 上证指数
pub const SH_BENCHMARK: &str = "1.000001";
/// 深证成指
pub const SZ_BENCHMARK: &str = "0.399001";
/// 北证50
pub const BJ_BENCHMARK: &str = "0.899050";

/// 多取的天数，抵消三市交易日不一致
pub const FETCH_BUFFER_DAYS: usize = 5;

/// 获取近 `days` 个交易日的全市场成交额
///
/// 三个指数依次请求，任一失败则整体失败，不返回部分结果
pub async fn market_turnover(
    client: &MarketClient,
    days: usize,
) -> Result<Vec<TurnoverRow>, FetchError> {
    if days == 0 {
        return Err(FetchError::InvalidRequest("天数必须为正整数".to_string()));
    }
    let limit = days
        .checked_add(FETCH_BUFFER_DAYS)
        .ok_or_else(|| FetchError::InvalidRequest(format!("天数过大: {}", days)))?;

    let sh = client.fetch_daily_quotes(&SH_BENCHMARK.parse::<SecId>()?, limit).await?;
    let sz = client.fetch_daily_quotes(&SZ_BENCHMARK.parse::<SecId>()?, limit).await?;
    let bj = client.fetch_daily_quotes(&BJ_BENCHMARK.parse::<SecId>()?, limit).await?;

    Ok(merge_turnover(&sh, &sz, &bj, days))
}

/// 按日期内连接三市K线，返回最后 `days` 行
pub fn merge_turnover(
    sh: &[DailyQuote],
    sz: &[DailyQuote],
    bj: &[DailyQuote],
    days: usize,
) -> Vec<TurnoverRow> {
    let sz_by_date = turnover_by_date(sz);
    let bj_by_date = turnover_by_date(bj);

    let mut rows: Vec<TurnoverRow> = sh
        .iter()
        .filter_map(|quote| {
            let sz_raw = sz_by_date.get(&quote.date)?;
            let bj_raw = bj_by_date.get(&quote.date)?;
            let (Some(sh_raw), Some(sz_raw), Some(bj_raw)) = (quote.turnover, *sz_raw, *bj_raw)
            else {
                log::warn!("{} 成交额缺失，跳过该日", quote.date);
                return None;
            };

            let sh = round2(sh_raw / YI);
            let sz = round2(sz_raw / YI);
            let bj = round2(bj_raw / YI);
            let total = round2(sh + sz + bj);

            Some(TurnoverRow {
                date: quote.date,
                sh,
                sz,
                bj,
                total,
                sentiment: Sentiment::classify(total),
            })
        })
        .collect();

    let skip = rows.len().saturating_sub(days);
    rows.split_off(skip)
}

fn turnover_by_date(quotes: &[DailyQuote]) -> HashMap<NaiveDate, Option<f64>> {
    quotes.iter().map(|q| (q.date, q.turnover)).collect()
}
