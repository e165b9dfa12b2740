//! 终端表格与着色
//!
//! 所有输出格式都由传入的 [`DisplayConfig`] 决定

use colored::Colorize;
use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::config::DisplayConfig;
use crate::models::{SectorAggregate, StockSnapshot, TurnoverRow};

/// 终端着色方案
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(display: &DisplayConfig) -> Self {
        Self { color: display.color }
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |s| s.magenta().to_string())
    }

    pub fn step(&self, text: &str) -> String {
        self.paint(&format!(">>> {}", text), |s| s.cyan().bold().to_string())
    }

    pub fn progress(&self, text: &str) -> String {
        self.paint(text, |s| s.blue().to_string())
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(text, |s| s.green().to_string())
    }

    pub fn failure(&self, text: &str) -> String {
        self.paint(text, |s| s.red().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

/// 千分位两位小数，如 `1,234.56`
pub fn format_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// 带符号百分比，如 `+1.23%`，缺失时为 `-`
pub fn format_signed_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}%", v),
        None => "-".to_string(),
    }
}

fn new_table(headers: &[&str], display: &DisplayConfig) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(headers.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());
    if let Some(width) = display.max_width {
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(width);
    }
    table
}

fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// 全市场成交表
pub fn turnover_table(rows: &[TurnoverRow], display: &DisplayConfig) -> String {
    let mut table = new_table(
        &["日期", "沪市(亿)", "深市(亿)", "北证(亿)", "总成交(亿)", "热度"],
        display,
    );
    for row in rows {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            number_cell(format!("{:.2}", row.sh)),
            number_cell(format!("{:.2}", row.sz)),
            number_cell(format!("{:.2}", row.bj)),
            number_cell(format!("{:.2}", row.total)),
            Cell::new(row.sentiment.label()),
        ]);
    }
    table.to_string()
}

/// 板块分布表
pub fn sector_table(rows: &[SectorAggregate], display: &DisplayConfig) -> String {
    let mut table = new_table(&["所属板块", "入围数量", "聚合成交", "平均涨跌"], display);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.sector),
            number_cell(row.count.to_string()),
            number_cell(format!("{}亿", format_thousands(row.turnover))),
            number_cell(format_signed_pct(row.mean_change_pct)),
        ]);
    }
    table.to_string()
}

/// 个股详情表
pub fn stock_table(rows: &[StockSnapshot], display: &DisplayConfig) -> String {
    let mut table = new_table(&["代码", "名称", "所属板块", "成交额(亿)", "涨跌幅"], display);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.code),
            Cell::new(&row.name),
            Cell::new(&row.sector),
            number_cell(
                row.turnover_yi()
                    .map(format_thousands)
                    .unwrap_or_else(|| "-".to_string()),
            ),
            number_cell(format_signed_pct(row.change_pct)),
        ]);
    }
    table.to_string()
}
