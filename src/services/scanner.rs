//! 成交额排名扫描
//!
//! 拉取当日成交额前 100 的个股快照，按板块聚合，并保留原始排名用于个股详情

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::FetchError;
use crate::models::{SectorAggregate, StockSnapshot, OTHER_SECTOR};

use super::client::MarketClient;
use super::common::{
    get_beijing_time, parse_number, MARKET_FILTER, SNAPSHOT_PAGE_SIZE, SNAPSHOT_SORT_FIELD, YI,
};

/// 接口字段编号与含义
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// 快照字段映射表，请求的 `fields` 参数按此顺序拼接
pub const SNAPSHOT_SCHEMA: [FieldSpec; 5] = [
    FieldSpec { id: "f12", name: "代码" },
    FieldSpec { id: "f14", name: "名称" },
    FieldSpec { id: "f6", name: "成交额" },
    FieldSpec { id: "f100", name: "所属板块" },
    FieldSpec { id: "f3", name: "涨跌幅" },
];

const FIELD_CODE: usize = 0;
const FIELD_NAME: usize = 1;
const FIELD_TURNOVER: usize = 2;
const FIELD_SECTOR: usize = 3;
const FIELD_CHANGE_PCT: usize = 4;

#[derive(Debug, Deserialize)]
struct ClistResponse {
    data: Option<ClistData>,
}

#[derive(Debug, Deserialize)]
struct ClistData {
    #[serde(default)]
    diff: Option<Vec<Map<String, Value>>>,
}

/// 一次扫描的结果
#[derive(Debug, Clone)]
pub struct MarketScan {
    /// 拉取时间（北京时间）
    pub fetched_at: String,
    /// 个股快照，保持接口返回的成交额降序
    pub stocks: Vec<StockSnapshot>,
    /// 全部板块聚合，已排序
    pub sectors: Vec<SectorAggregate>,
}

impl MarketScan {
    pub fn from_stocks(stocks: Vec<StockSnapshot>, fetched_at: String) -> Self {
        let sectors = aggregate_sectors(&stocks);
        Self {
            fetched_at,
            stocks,
            sectors,
        }
    }

    /// 前 `n` 个板块
    pub fn top_sectors(&self, n: usize) -> &[SectorAggregate] {
        &self.sectors[..n.min(self.sectors.len())]
    }

    /// 成交额排名前 `n` 的个股
    pub fn top_stocks(&self, n: usize) -> &[StockSnapshot] {
        &self.stocks[..n.min(self.stocks.len())]
    }
}

impl MarketClient {
    /// 获取成交额排名前 100 的个股快照
    pub async fn fetch_snapshot(&self) -> Result<Vec<StockSnapshot>, FetchError> {
        let fields = SNAPSHOT_SCHEMA
            .iter()
            .map(|f| f.id)
            .collect::<Vec<_>>()
            .join(",");

        let params = [
            ("pn", "1".to_string()),
            ("pz", SNAPSHOT_PAGE_SIZE.to_string()),
            ("po", "1".to_string()),
            ("np", "1".to_string()),
            ("fltt", "2".to_string()),
            ("invt", "2".to_string()),
            ("fid", SNAPSHOT_SORT_FIELD.to_string()),
            ("fs", MARKET_FILTER.to_string()),
            ("fields", fields),
        ];

        let response: ClistResponse = self.get_json(&self.clist_url, &params).await?;

        let diff = response
            .data
            .and_then(|d| d.diff)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| FetchError::Empty("成交额排名为空".to_string()))?;

        let stocks = diff
            .iter()
            .enumerate()
            .map(|(idx, row)| parse_snapshot_row(row, idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("📊 解析到 {} 只个股快照", stocks.len());
        Ok(stocks)
    }
}

/// 拉取快照并聚合
pub async fn scan_market(client: &MarketClient) -> Result<MarketScan, FetchError> {
    let stocks = client.fetch_snapshot().await?;
    Ok(MarketScan::from_stocks(stocks, get_beijing_time()))
}

/// 按映射表解析一行快照，`row` 从 1 开始计数
fn parse_snapshot_row(row: &Map<String, Value>, row_no: usize) -> Result<StockSnapshot, FetchError> {
    let mut values = [&Value::Null; SNAPSHOT_SCHEMA.len()];
    for (slot, spec) in values.iter_mut().zip(SNAPSHOT_SCHEMA.iter()) {
        *slot = row.get(spec.id).ok_or_else(|| {
            log::warn!("快照第 {} 行缺少{}字段 {}", row_no, spec.name, spec.id);
            FetchError::MissingField {
                field: spec.id,
                row: row_no,
            }
        })?;
    }

    let sector = value_as_text(values[FIELD_SECTOR]);
    let sector = if sector.is_empty() {
        OTHER_SECTOR.to_string()
    } else {
        sector
    };

    Ok(StockSnapshot {
        code: value_as_text(values[FIELD_CODE]),
        name: value_as_text(values[FIELD_NAME]),
        turnover: value_as_number(values[FIELD_TURNOVER]),
        sector,
        change_pct: value_as_number(values[FIELD_CHANGE_PCT]),
    })
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 停牌等情况接口会返回 "-"，记为缺失
fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

#[derive(Default)]
struct SectorAccumulator {
    count: usize,
    turnover: f64,
    change_sum: f64,
    change_count: usize,
}

/// 按板块聚合：入围数量、聚合成交（亿）、平均涨跌幅
///
/// 排序：入围数量降序，再按聚合成交降序，并列时按板块名升序
pub fn aggregate_sectors(stocks: &[StockSnapshot]) -> Vec<SectorAggregate> {
    let mut groups: BTreeMap<&str, SectorAccumulator> = BTreeMap::new();

    for stock in stocks {
        let acc = groups.entry(stock.sector.as_str()).or_default();
        acc.count += 1;
        if let Some(turnover) = stock.turnover {
            acc.turnover += turnover / YI;
        }
        if let Some(change) = stock.change_pct {
            acc.change_sum += change;
            acc.change_count += 1;
        }
    }

    let mut sectors: Vec<SectorAggregate> = groups
        .into_iter()
        .map(|(sector, acc)| SectorAggregate {
            sector: sector.to_string(),
            count: acc.count,
            turnover: acc.turnover,
            mean_change_pct: (acc.change_count > 0)
                .then(|| acc.change_sum / acc.change_count as f64),
        })
        .collect();

    sectors.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.turnover.total_cmp(&a.turnover))
    });
    sectors
}
