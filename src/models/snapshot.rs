//! 成交额排名快照模型
//!
//! 定义个股快照行和板块聚合行

use serde::{Deserialize, Serialize};

/// 板块为空时的归类名称
pub const OTHER_SECTOR: &str = "其他";

/// 成交额排名中的单只股票
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// 股票代码
    pub code: String,
    /// 股票名称
    pub name: String,
    /// 成交额（元）
    pub turnover: Option<f64>,
    /// 所属板块，空值已归为“其他”
    pub sector: String,
    /// 涨跌幅（百分比）
    pub change_pct: Option<f64>,
}

impl StockSnapshot {
    /// 成交额（亿）
    pub fn turnover_yi(&self) -> Option<f64> {
        self.turnover.map(|v| v / 1e8)
    }
}

/// 板块聚合统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    /// 板块名称
    pub sector: String,
    /// 入围数量
    pub count: usize,
    /// 聚合成交（亿）
    pub turnover: f64,
    /// 平均涨跌幅，全部缺失时为 None
    pub mean_change_pct: Option<f64>,
}
