//! 시장 데이터 달력 TUI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 설정으로 시작 (BTCUSDT, 일봉)
//! marketcal
//!
//! # 이더리움 주봉으로 시작
//! marketcal -s ETHUSDT -t 1w
//!
//! # 설정 파일 사용
//! marketcal -c config/default.toml
//! ```

use clap::Parser;
use marketcal_core::{init_logging, AppConfig, Instrument, LogConfig, Timeframe};
use marketcal_data::MarketStore;
use marketcal_exchange::{BinanceConfig, BinanceMarketData};
use std::sync::Arc;
use tracing::info;

mod app;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "marketcal")]
#[command(about = "시장 데이터 달력 - 터미널 월간 달력 위에 Binance 캔들 데이터를 표시", long_about = None)]
#[command(version)]
struct Cli {
    /// 거래소 티커 (예: BTCUSDT)
    #[arg(short, long)]
    symbol: Option<String>,

    /// 타임프레임 (1d: 일봉, 1w: 주봉, 1M: 월봉)
    #[arg(short, long)]
    timeframe: Option<String>,

    /// 설정 파일 경로 (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// 로그 파일 경로 (기본: marketcal.log)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    // TUI가 터미널을 점유하므로 로그는 파일로 보낸다
    let log_path = cli
        .log_file
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| "marketcal.log".to_string());
    let log_config = LogConfig::from_settings(&config.logging).with_file(&log_path);
    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let instrument: Instrument = cli
        .symbol
        .unwrap_or_else(|| config.market.default_symbol.clone())
        .parse()?;
    let timeframe: Timeframe = cli
        .timeframe
        .unwrap_or_else(|| config.market.default_timeframe.clone())
        .parse()?;

    let watchlist: Vec<Instrument> = config
        .market
        .watchlist
        .iter()
        .map(Instrument::new)
        .collect();

    info!(%instrument, %timeframe, "Starting marketcal");

    let source = BinanceMarketData::new(BinanceConfig::from_settings(&config.binance))?;
    let store = MarketStore::new(instrument, timeframe);
    let app = App::new(
        store,
        Arc::new(source),
        watchlist,
        config.binance.default_limit,
    );

    app.run().await
}
