use std::collections::HashMap;
use std::time::Duration;

use log::{error, info, warn};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::error::FetchError;
use crate::ui::core::WidgetEvent;

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
const ASSET_ID: &str = "pi-network";
const VS_CURRENCY: &str = "usd";

/// One poll every 30 seconds; 60 samples span 30 minutes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Keeps a hung request from running into the next tick.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct AssetQuote {
    usd: Option<f64>,
}

/// Single best-effort GET per tick against the CoinGecko simple-price
/// endpoint. No retries; the next tick is the retry.
pub struct PriceFetcher {
    client: reqwest::Client,
}

impl PriceFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;
        Ok(Self { client })
    }

    pub async fn fetch(&self) -> Result<f64, FetchError> {
        let response = self
            .client
            .get(COINGECKO_URL)
            .query(&[("ids", ASSET_ID), ("vs_currencies", VS_CURRENCY)])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_price(&body)
    }
}

/// Expected shape: `{"pi-network": {"usd": 0.1234}}`. A body that is not
/// JSON at all is `Unknown`; valid JSON without the price field is
/// `MissingData`.
fn parse_price(body: &str) -> Result<f64, FetchError> {
    let quotes: HashMap<String, AssetQuote> =
        serde_json::from_str(body).map_err(|e| FetchError::Unknown(e.to_string()))?;

    quotes
        .get(ASSET_ID)
        .and_then(|quote| quote.usd)
        .ok_or(FetchError::MissingData)
}

/// Poll loop: fetch once per interval and post the outcome to the widget.
/// The first tick fires immediately, so the widget shows a price (or an
/// error) right at startup. Runs until the widget drops the receiver.
pub async fn poll_prices(fetcher: PriceFetcher, events: mpsc::Sender<WidgetEvent>) {
    let mut interval = tokio::time::interval(POLL_INTERVAL);

    loop {
        interval.tick().await;

        let outcome = fetcher.fetch().await;
        match &outcome {
            Ok(price) => info!("{}: ${} {}", ASSET_ID, price, VS_CURRENCY),
            Err(e) => warn!("fetch failed: {}", e),
        }

        if events.send(WidgetEvent::Tick(outcome)).await.is_err() {
            error!("widget channel closed, stopping poll loop");
            break;
        }
    }
}
