//! 全市场成交额模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 市场热度分档，按总成交额（亿）划分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// 冷清 (< 6000 亿)
    Cold,
    /// 温和 [6000, 8000)
    Mild,
    /// 活跃 [8000, 10000)
    Active,
    /// 火爆 (>= 10000 亿)
    Hot,
}

/// 冷清/温和分界（亿）
pub const MILD_THRESHOLD: f64 = 6000.0;
/// 温和/活跃分界（亿）
pub const ACTIVE_THRESHOLD: f64 = 8000.0;
/// 活跃/火爆分界（亿）
pub const HOT_THRESHOLD: f64 = 10000.0;

impl Sentiment {
    /// 按总成交额分档，下界包含
    pub fn classify(total: f64) -> Self {
        if total < MILD_THRESHOLD {
            Sentiment::Cold
        } else if total < ACTIVE_THRESHOLD {
            Sentiment::Mild
        } else if total < HOT_THRESHOLD {
            Sentiment::Active
        } else {
            Sentiment::Hot
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Cold => "🥶 冷清",
            Sentiment::Mild => "😐 温和",
            Sentiment::Active => "😃 活跃",
            Sentiment::Hot => "🔥 火爆",
        }
    }
}

/// 沪深北三市合并后的单日成交（单位：亿）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRow {
    /// 交易日
    pub date: NaiveDate,
    /// 沪市成交额
    pub sh: f64,
    /// 深市成交额
    pub sz: f64,
    /// 北证成交额
    pub bj: f64,
    /// 三市合计
    pub total: f64,
    /// 热度
    pub sentiment: Sentiment,
}
