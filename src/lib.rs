pub mod config;
pub mod convert;
pub mod core;
pub mod log;
pub mod providers;
pub mod store;
pub mod ui;

use crate::convert::Converter;
use crate::core::currency::CurrencyRateProvider;
use crate::core::history::{ConversionRecord, HistoryStore};
use crate::providers::freecurrency::FreeCurrencyProvider;
use crate::store::disk::DiskBacking;
use anyhow::Result;
use chrono::{Local, TimeZone};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        from: String,
        to: String,
        amount: f64,
    },
    History,
    Replay {
        index: usize,
    },
    Clear,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let (base_url, api_key) = config.providers.freecurrency.as_ref().map_or(
        ("https://api.freecurrencyapi.com", ""),
        |p| (p.base_url.as_str(), p.api_key.as_str()),
    );
    let provider = FreeCurrencyProvider::new(base_url, api_key);

    let backing = Arc::new(DiskBacking::open(&config.history_db_path()?)?);
    let converter = Converter::new(provider, HistoryStore::new(backing));

    match command {
        AppCommand::Convert { from, to, amount } => {
            run_convert(&converter, &from, &to, amount).await
        }
        AppCommand::Replay { index } => {
            let records = converter.history();
            match index.checked_sub(1).and_then(|i| records.get(i)) {
                Some(record) => {
                    let record = record.clone();
                    run_convert(&converter, &record.from, &record.to, record.amount).await
                }
                None => {
                    println!(
                        "{}",
                        ui::style_text(
                            &format!("No history entry {index}"),
                            ui::StyleType::Error
                        )
                    );
                    Ok(())
                }
            }
        }
        AppCommand::History => {
            display_history(&converter.history());
            Ok(())
        }
        AppCommand::Clear => {
            converter.clear_history();
            println!("{}", ui::style_text("History cleared", ui::StyleType::Subtle));
            Ok(())
        }
    }
}

async fn run_convert<P: CurrencyRateProvider>(
    converter: &Converter<P>,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching {from} to {to} rate..."));
    let outcome = converter.convert(from, to, amount).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(conversion) => {
            println!(
                "{amount:.2} {from} = {}",
                ui::style_text(&conversion.display_text, ui::StyleType::TotalValue)
            );
            println!(
                "{}",
                ui::style_text(&conversion.rate_text, ui::StyleType::Subtle)
            );
        }
        Err(e) => {
            println!(
                "{}",
                ui::style_text(&format!("Error: {e}"), ui::StyleType::Error)
            );
        }
    }
    Ok(())
}

fn display_history(records: &[ConversionRecord]) {
    if records.is_empty() {
        println!("{}", ui::style_text("History is empty", ui::StyleType::Subtle));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Conversion"),
        ui::header_cell("Rate"),
        ui::header_cell("When"),
    ]);

    for (index, record) in records.iter().enumerate() {
        table.add_row(vec![
            ui::numeric_cell(&format!("{}", index + 1)),
            comfy_table::Cell::new(format!(
                "{:.2} {} \u{2192} {:.2} {}",
                record.amount, record.from, record.result, record.to
            )),
            ui::numeric_cell(&format!("{:.6}", record.rate)),
            comfy_table::Cell::new(format_timestamp(record.timestamp)),
        ]);
    }

    println!("{table}");
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
