//! 交互主循环
//!
//! 依次询问天数、板块数量、个股数量，执行汇总与扫描后等待回车重新开始。
//! 输入输出以泛型注入，终端和测试共用同一套流程。

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::{AppConfig, DisplayConfig, PromptConfig};
use crate::error::{FetchError, FetchErrorKind, InputError};
use crate::services::client::MarketClient;
use crate::services::scanner::scan_market;
use crate::services::turnover::market_turnover;

use super::render::{sector_table, stock_table, turnover_table, Theme};

const RULE_WIDTH: usize = 50;

/// 一轮交互结束后的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    Continue,
    Exit,
}

/// 交互会话
pub struct Session<'a, R, W> {
    client: &'a MarketClient,
    prompt: &'a PromptConfig,
    display: &'a DisplayConfig,
    theme: Theme,
    input: R,
    output: W,
}

/// 解析数量输入，空输入取默认值
pub fn parse_count(input: &str, default: usize) -> Result<usize, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }
    input
        .parse::<usize>()
        .map_err(|_| InputError::NotANumber(input.to_string()))
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(client: &'a MarketClient, config: &'a AppConfig, input: R, output: W) -> Self {
        Self {
            client,
            prompt: &config.prompt,
            display: &config.display,
            theme: Theme::new(&config.display),
            input,
            output,
        }
    }

    /// 运行到用户输入 0 或输入流结束
    pub async fn run(&mut self) -> io::Result<()> {
        self.banner()?;
        while self.cycle().await? == Cycle::Continue {}
        log::debug!("交互结束");
        Ok(())
    }

    fn banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let text = format!("{}\n   📈 A股市场 交互式资金分析终端\n{}", rule, rule);
        writeln!(self.output, "{}", self.theme.header(&text))
    }

    async fn cycle(&mut self) -> io::Result<Cycle> {
        // 步骤 1: 市场总成交
        self.step("【步骤 1/3】您想获得近几天的数据？")?;
        let days_prompt = format!(
            "请输入天数 (默认{}，输入0退出): ",
            self.prompt.default_days
        );
        let Some(days_input) = self.read_input(&days_prompt).await? else {
            return Ok(Cycle::Exit);
        };
        if days_input == "0" {
            return Ok(Cycle::Exit);
        }
        let days = match parse_count(&days_input, self.prompt.default_days) {
            Ok(0) => return Ok(Cycle::Exit),
            Ok(days) => days,
            Err(e) => return self.reject(e),
        };

        self.show_market_turnover(days).await?;

        // 步骤 2: 板块分布
        self.step("【步骤 2/3】想看今天资金战场前多少个股板块统计？")?;
        let sector_prompt = format!("请输入板块数量 (默认{}): ", self.prompt.default_sectors);
        let Some(sector_input) = self.read_input(&sector_prompt).await? else {
            return Ok(Cycle::Exit);
        };
        let sector_num = match parse_count(&sector_input, self.prompt.default_sectors) {
            Ok(n) => n,
            Err(e) => return self.reject(e),
        };

        // 步骤 3: 龙头详情
        self.step("【步骤 3/3】想获得今天龙头详情成交额排名前几个股？")?;
        let stock_prompt = format!("请输入个股数量 (默认{}): ", self.prompt.default_stocks);
        let Some(stock_input) = self.read_input(&stock_prompt).await? else {
            return Ok(Cycle::Exit);
        };
        let stock_num = match parse_count(&stock_input, self.prompt.default_stocks) {
            Ok(n) => n,
            Err(e) => return self.reject(e),
        };

        // 板块和个股共用一次请求
        self.show_sector_and_stocks(sector_num, stock_num).await?;

        let rule = "-".repeat(RULE_WIDTH);
        let footer = format!("\n{}\n分析完成！按回车键重新开始，或按 Ctrl+C 退出。\n{}", rule, rule);
        writeln!(self.output, "{}", self.theme.header(&footer))?;
        match self.read_input("").await? {
            Some(_) => Ok(Cycle::Continue),
            None => Ok(Cycle::Exit),
        }
    }

    async fn show_market_turnover(&mut self, days: usize) -> io::Result<()> {
        writeln!(self.output, "{}", self.theme.progress("正在拉取沪深北三市数据..."))?;

        match market_turnover(self.client, days).await {
            Ok(rows) => {
                let title = format!("\n--- 近 {} 天全市场成交数据 ---", days);
                writeln!(self.output, "{}", self.theme.title(&title))?;
                writeln!(self.output, "{}", turnover_table(&rows, self.display))
            }
            Err(e) => {
                log::warn!("全市场成交额获取失败: {}", e);
                let message = match e.kind() {
                    FetchErrorKind::Network => "数据获取失败，请检查网络。".to_string(),
                    _ => format!("数据获取失败: {}", e),
                };
                writeln!(self.output, "{}", self.theme.failure(&message))
            }
        }
    }

    async fn show_sector_and_stocks(&mut self, sector_num: usize, stock_num: usize) -> io::Result<()> {
        writeln!(self.output, "{}", self.theme.progress("正在扫描今日资金战场 (Top 100)..."))?;

        let scan = match scan_market(self.client).await {
            Ok(scan) => scan,
            Err(e) => return self.report_scan_failure(e),
        };

        let title = format!(
            "\n--- 📊 今日资金战场：前 {} 个板块分布 ({}) ---",
            sector_num, scan.fetched_at
        );
        writeln!(self.output, "{}", self.theme.title(&title))?;
        writeln!(self.output, "{}", sector_table(scan.top_sectors(sector_num), self.display))?;

        let title = format!("\n--- 🔍 龙头详情：成交额排名 前 {} 个股 ---", stock_num);
        writeln!(self.output, "{}", self.theme.title(&title))?;
        writeln!(self.output, "{}", stock_table(scan.top_stocks(stock_num), self.display))
    }

    fn report_scan_failure(&mut self, e: FetchError) -> io::Result<()> {
        log::warn!("成交额排名扫描失败: {}", e);
        writeln!(self.output, "{}", self.theme.failure(&format!("分析失败: {}", e)))
    }

    fn reject(&mut self, e: InputError) -> io::Result<Cycle> {
        log::debug!("无效输入: {:?}", e);
        writeln!(self.output, "{}", self.theme.failure(&e.to_string()))?;
        Ok(Cycle::Continue)
    }

    fn step(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", self.theme.step(text))
    }

    /// 输出提示并读取一行，输入流结束返回 None
    async fn read_input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::services::turnover::{BJ_BENCHMARK, SH_BENCHMARK, SZ_BENCHMARK};
    use serde_json::json;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KLINE_PATH: &str = "/api/qt/stock/kline/get";
    const CLIST_PATH: &str = "/api/qt/clist/get";

    fn test_config(server: &MockServer) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                kline_url: format!("{}{}", server.uri(), KLINE_PATH),
                clist_url: format!("{}{}", server.uri(), CLIST_PATH),
                ..ApiConfig::default()
            },
            display: DisplayConfig {
                color: false,
                max_width: None,
            },
            ..AppConfig::default()
        }
    }

    async fn run_session(server: &MockServer, input: &str) -> String {
        let config = test_config(server);
        let client = MarketClient::new(&config.api).unwrap();
        let mut output: Vec<u8> = Vec::new();
        let mut session = Session::new(&client, &config, input.as_bytes(), &mut output);
        session.run().await.unwrap();
        String::from_utf8(output).unwrap()
    }

    async fn mount_kline(server: &MockServer, secid: &str, turnover: f64) {
        let klines: Vec<String> = ["2024-03-04", "2024-03-05", "2024-03-06"]
            .iter()
            .map(|d| format!("{},1,2,3,4,5,{},7,8,9,10", d, turnover))
            .collect();
        Mock::given(method("GET"))
            .and(path(KLINE_PATH))
            .and(query_param("secid", secid))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "rc": 0, "data": { "klines": klines } })),
            )
            .mount(server)
            .await;
    }

    async fn mount_clist(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(CLIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rc": 0,
                "data": {
                    "total": 3,
                    "diff": [
                        { "f12": "601138", "f14": "工业富联", "f6": 1.52e10, "f100": "消费电子", "f3": 4.12 },
                        { "f12": "300750", "f14": "宁德时代", "f6": 9.8e9, "f100": "电池", "f3": -0.8 },
                        { "f12": "002475", "f14": "立讯精密", "f6": 6.1e9, "f100": "消费电子", "f3": 1.0 }
                    ]
                }
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("", 7), Ok(7));
        assert_eq!(parse_count("  ", 5), Ok(5));
        assert_eq!(parse_count("12", 7), Ok(12));
        assert!(parse_count("abc", 7).is_err());
        assert!(parse_count("-3", 7).is_err());
        assert!(parse_count("2.5", 7).is_err());
    }

    #[tokio::test]
    async fn test_zero_exits_without_fetch() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let out = run_session(&server, "0\n").await;
        assert!(out.contains("A股市场 交互式资金分析终端"));
        assert!(out.contains("请输入天数 (默认7，输入0退出)"));
        assert!(!out.contains("正在拉取"));
    }

    #[tokio::test]
    async fn test_invalid_input_restarts_cycle() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let out = run_session(&server, "abc\n0\n").await;
        assert!(out.contains("请输入有效的数字！"));
        assert_eq!(out.matches("【步骤 1/3】").count(), 2);
    }

    #[tokio::test]
    async fn test_full_cycle_with_defaults() {
        let server = MockServer::start().await;
        mount_kline(&server, SH_BENCHMARK, 4.2e11).await;
        mount_kline(&server, SZ_BENCHMARK, 5.6e11).await;
        mount_kline(&server, BJ_BENCHMARK, 1.5e9).await;
        mount_clist(&server).await;

        // 2 天，板块与个股取默认值，回车后输入 0 退出
        let out = run_session(&server, "2\n\n\n\n0\n").await;

        assert!(out.contains("近 2 天全市场成交数据"));
        assert!(!out.contains("2024-03-04"));
        assert!(out.contains("2024-03-06"));
        assert!(out.contains("9815.00"));
        assert!(out.contains("😃 活跃"));

        assert!(out.contains("前 5 个板块分布"));
        assert!(out.contains("消费电子"));
        assert!(out.contains("213.00亿"));
        assert!(out.contains("+2.56%"));

        let first = out.find("工业富联").unwrap();
        let second = out.find("宁德时代").unwrap();
        let third = out.find("立讯精密").unwrap();
        assert!(first < second && second < third);
        assert!(out.contains("分析完成！"));
    }

    #[tokio::test]
    async fn test_index_failure_shows_no_partial_table() {
        let server = MockServer::start().await;
        mount_kline(&server, SH_BENCHMARK, 4.2e11).await;
        mount_kline(&server, SZ_BENCHMARK, 5.6e11).await;
        Mock::given(method("GET"))
            .and(query_param("secid", BJ_BENCHMARK))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_clist(&server).await;

        let out = run_session(&server, "3\n1\n1\n").await;
        assert!(out.contains("数据获取失败，请检查网络。"));
        assert!(!out.contains("总成交(亿)"));
        // 扫描仍然执行
        assert!(out.contains("前 1 个板块分布"));
    }

    #[tokio::test]
    async fn test_huge_day_count_reported_not_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(KLINE_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        mount_clist(&server).await;

        let input = format!("{}\n\n\n", usize::MAX);
        let out = run_session(&server, &input).await;
        assert!(out.contains("数据获取失败: 请求参数无效"));
        assert!(!out.contains("总成交(亿)"));
        assert!(out.contains("前 5 个板块分布"));
    }

    #[tokio::test]
    async fn test_scan_failure_reported() {
        let server = MockServer::start().await;
        mount_kline(&server, SH_BENCHMARK, 4.2e11).await;
        mount_kline(&server, SZ_BENCHMARK, 5.6e11).await;
        mount_kline(&server, BJ_BENCHMARK, 1.5e9).await;
        Mock::given(method("GET"))
            .and(path(CLIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "diff": [ { "f12": "600000", "f14": "浦发银行" } ] }
            })))
            .mount(&server)
            .await;

        let out = run_session(&server, "1\n\nabc\n0\n").await;
        // 个股数量无效时不发起扫描
        assert!(out.contains("请输入有效的数字！"));

        let out = run_session(&server, "1\n\n\n").await;
        assert!(out.contains("分析失败: 第 1 行缺少字段 f6"));
        assert!(!out.contains("成交额排名 前"));
    }
}
