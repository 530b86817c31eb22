use marketdash::models::series::Direction;
use marketdash::services::panel::Panel;
use marketdash::{Config, PanelService};

use anyhow::{bail, Result};
use clap::{App, Arg, SubCommand};
use log::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("marketdash")
        .version("0.1.0")
        .author("marketdash team")
        .about("Stock and crypto dashboard data layer")
        .arg(
            Arg::with_name("live")
                .long("live")
                .help("Use live market data APIs instead of mock data")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Enable debug mode")
                .takes_value(false),
        )
        .subcommand(
            SubCommand::with_name("fetch")
                .about("Fetch one symbol and print its series and metrics")
                .arg(
                    Arg::with_name("market")
                        .short('m')
                        .long("market")
                        .value_name("MARKET")
                        .help("Market to fetch from (stock, crypto)")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("symbol")
                        .short('s')
                        .long("symbol")
                        .value_name("SYMBOL")
                        .help("Ticker or coin symbol, e.g. AAPL or BTC")
                        .required(true)
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("days")
                        .short('d')
                        .long("days")
                        .value_name("DAYS")
                        .help("Number of days of history to fetch")
                        .takes_value(true)
                        .default_value("30"),
                ),
        )
        .subcommand(
            SubCommand::with_name("overview")
                .about("Fetch a stock panel and a crypto panel side by side")
                .arg(
                    Arg::with_name("stock")
                        .long("stock")
                        .value_name("SYMBOL")
                        .help("Stock symbol for the left panel")
                        .takes_value(true)
                        .default_value("AAPL"),
                )
                .arg(
                    Arg::with_name("crypto")
                        .long("crypto")
                        .value_name("SYMBOL")
                        .help("Crypto symbol for the right panel")
                        .takes_value(true)
                        .default_value("BTC"),
                )
                .arg(
                    Arg::with_name("days")
                        .short('d')
                        .long("days")
                        .value_name("DAYS")
                        .help("Number of days of history to fetch")
                        .takes_value(true)
                        .default_value("30"),
                ),
        );

    let matches = app.get_matches();

    let mut config = Config::from_env()?;
    if matches.is_present("live") {
        config = config.with_use_mock_data(false);
        config.validate()?;
    }
    if matches.is_present("debug") {
        config = config.with_debug_mode(true);
    }

    let service = PanelService::new(&config)?;

    if let Some(matches) = matches.subcommand_matches("fetch") {
        let market = matches.value_of("market").unwrap();
        let symbol = matches.value_of("symbol").unwrap();
        let days = parse_days(matches.value_of("days").unwrap_or("30"))?;

        let panel = match market.to_lowercase().as_str() {
            "stock" => service.stock_panel(symbol, days).await?,
            "crypto" => service.crypto_panel(symbol, days).await?,
            _ => bail!("Unknown market: {}", market),
        };

        print_panel(&panel, config.debug_mode);
    } else if let Some(matches) = matches.subcommand_matches("overview") {
        let stock_symbol = matches.value_of("stock").unwrap();
        let crypto_symbol = matches.value_of("crypto").unwrap();
        let days = parse_days(matches.value_of("days").unwrap_or("30"))?;

        // Each panel renders its own fallback state on failure
        let (stock, crypto) = service.overview(stock_symbol, crypto_symbol, days).await;
        match stock {
            Ok(panel) => print_panel(&panel, config.debug_mode),
            Err(e) => error!("Stock panel {} unavailable: {}", stock_symbol, e),
        }
        match crypto {
            Ok(panel) => print_panel(&panel, config.debug_mode),
            Err(e) => error!("Crypto panel {} unavailable: {}", crypto_symbol, e),
        }
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

// 非法的 --days 直接报错，绝不悄悄回退到默认值
fn parse_days(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(days) => Ok(days),
        Err(_) => bail!("Invalid --days value: {}", raw),
    }
}

fn print_panel(panel: &Panel, show_points: bool) {
    let metrics = &panel.metrics;
    let arrow = match metrics.direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Flat => "─",
    };

    let label = if panel.series.is_approximated {
        format!("{} (approximated)", panel.series.symbol)
    } else {
        panel.series.symbol.clone()
    };

    info!("{:-<60}", "");
    info!(
        "{}: {} {} {:.2}%",
        label,
        panel.series.last_close().unwrap_or(0.0),
        arrow,
        metrics.percent_change.abs()
    );
    info!("Previous Close   {:>16.2}", metrics.previous_close);
    info!("Fifty Day Avg    {:>16.2}", metrics.moving_average_50);
    info!("200 Day Avg      {:>16.2}", metrics.moving_average_200);
    info!("52 Week High     {:>16.2}", metrics.year_high);
    info!("52 Week Low      {:>16.2}", metrics.year_low);

    if show_points {
        info!(
            "{:<12} {:<12} {:<12} {:<12} {:<12} {:<15}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for p in &panel.series.points {
            info!(
                "{:<12} {:<12.2} {:<12.2} {:<12.2} {:<12.2} {:<15.0}",
                p.date.to_string(),
                p.open,
                p.high,
                p.low,
                p.close,
                p.volume
            );
        }
    }
}
