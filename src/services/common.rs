//! 公共常量和辅助函数

use chrono::Utc;
use chrono_tz::Asia::Shanghai;

// ==================== 东方财富 K线接口参数 ====================

/// K线接口固定令牌
pub const KLINE_UT: &str = "fa5fd1943c7b386f172d6893dbfba10b";
/// 返回的元数据字段
pub const KLINE_FIELDS1: &str = "f1,f2,f3,f4,f5,f6";
/// K线字段：日期,开盘,收盘,最高,最低,成交量,成交额,振幅,涨跌幅,涨跌额,换手率
pub const KLINE_FIELDS2: &str = "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61";
/// 日线周期
pub const KLINE_PERIOD_DAILY: &str = "101";
/// 前复权
pub const KLINE_ADJUST: &str = "1";
/// 结束日期哨兵，取到最新
pub const KLINE_END_SENTINEL: &str = "20500101";

// ==================== 东方财富排名接口参数 ====================

/// 每页条数
pub const SNAPSHOT_PAGE_SIZE: usize = 100;
/// 排序字段：成交额
pub const SNAPSHOT_SORT_FIELD: &str = "f6";
/// 市场筛选：深主板、创业板、沪主板、科创板、北交所
pub const MARKET_FILTER: &str = "m:0+t:6,m:0+t:80,m:1+t:2,m:1+t:23,m:0+t:81+s:2048";

/// 元 -> 亿
pub const YI: f64 = 1e8;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 宽松解析数值，"-"、空串等记为缺失
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 获取北京时间字符串
pub fn get_beijing_time() -> String {
    Utc::now()
        .with_timezone(&Shanghai)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
