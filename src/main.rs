use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use ohlc_timeframe::config::{Config, ALL_TIMEFRAMES};
use ohlc_timeframe::normalizer::Normalizer;
use ohlc_timeframe::series::{build_all, SeriesUpdate};
use ohlc_timeframe::source;

#[derive(Debug, Default)]
struct CliArgs {
    timeframe: Option<String>,
    data: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "help" | "--help" | "-h" => out.help = true,
            "--data" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("`--data` requires a path argument"))?;
                out.data = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => bail!("unknown option `{}`", other),
            other => {
                if out.timeframe.is_some() {
                    bail!("unexpected argument `{}`", other);
                }
                out.timeframe = Some(other.to_string());
            }
        }
    }
    Ok(out)
}

fn print_usage() {
    println!("usage: ohlc-timeframe [TIMEFRAME|all] [--data PATH]");
    println!();
    println!("Prints the candle series for TIMEFRAME (default from config) as JSON.");
    println!("`all` prints one series per configured timeframe.");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    if cli.help {
        print_usage();
        return Ok(());
    }

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set OHLC_TIMEFRAME_CONFIG or create config/default.toml");
            std::process::exit(1);
        }
    };

    // stdout carries the payload, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let table = config.timeframe_table()?;
    let data_path = cli.data.unwrap_or_else(|| config.data.path.clone());
    let timeframe = cli
        .timeframe
        .unwrap_or_else(|| config.chart.timeframe.clone());

    tracing::info!(
        data = %data_path.display(),
        timeframe = %timeframe,
        "Starting ohlc-timeframe"
    );

    let records = source::load_records(&data_path)?;
    let base = Normalizer::with_offset(config.utc_offset()?)
        .normalize(&records)
        .with_context(|| format!("{} is unusable", data_path.display()))?;

    let json = if timeframe == ALL_TIMEFRAMES {
        serde_json::to_string_pretty(&build_all(&base, &table)?)?
    } else {
        let update = SeriesUpdate::build(&base, &timeframe, &table)?;
        if update.is_loading() {
            tracing::warn!(timeframe = %timeframe, "No complete candles for timeframe");
        }
        serde_json::to_string_pretty(&update)?
    };
    println!("{}", json);

    Ok(())
}
