use env_logger::Builder;
use log::{info, LevelFilter};
use std::error::Error;
use std::io::Write;

use piwatch::api::coingecko::{self, PriceFetcher};
use piwatch::ui::widget::PriceWidget;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Configure logger
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("piwatch", LevelFilter::Debug)
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr) // Keep logs separate from the TUI
        .write_style(env_logger::WriteStyle::Always)
        .init();

    info!("Starting piwatch...");

    let (events_tx, events_rx) = tokio::sync::mpsc::channel(100);

    // Start the 30-second poll loop
    let fetcher = PriceFetcher::new()?;
    let poll_handle = tokio::spawn(coingecko::poll_prices(fetcher, events_tx.clone()));

    // Run the widget on the main task; it owns the terminal
    let mut widget = PriceWidget::new(events_tx);
    widget.run(events_rx).await?;

    poll_handle.abort();
    info!("Shutdown complete");
    Ok(())
}
