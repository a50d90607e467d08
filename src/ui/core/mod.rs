pub mod alerts;
pub mod history;
pub mod prefs;

use log::{debug, warn};

use crate::error::FetchError;
use self::alerts::AlertPolicy;
use self::history::PriceHistory;
use self::prefs::PreferenceState;

/// Everything the widget loop reacts to. The poll task posts `Tick`, the
/// do-not-disturb expiry task posts `DndExpired`; key input is handled
/// directly by the widget and never goes through the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Tick(Result<f64, FetchError>),
    DndExpired,
}

/// What the core needs from the display layer. The terminal widget is the
/// real implementation; tests substitute a recording fake. The core never
/// touches terminal geometry or input.
pub trait DisplayController {
    fn set_text(&mut self, text: String);
    fn set_text_color(&mut self, black: bool);
    fn play_beep(&mut self);
    fn show_error(&mut self, message: String);
}

/// One tick of the price-check cycle: apply a fetch outcome to the history,
/// evaluate the alert policy once the window is full, and push the result to
/// the display. Fetch errors stop here; a failed tick records no sample.
pub fn apply_tick(
    outcome: Result<f64, FetchError>,
    history: &mut PriceHistory,
    prefs: &PreferenceState,
    display: &mut dyn DisplayController,
) {
    match outcome {
        Ok(price) => {
            display.set_text(format!("π ${}", price));
            history.record(price);

            if let Some(change) = history.percentage_change() {
                debug!("30-min change: {:.2}%", change);
                if AlertPolicy::evaluate(change, prefs).triggered {
                    display.play_beep();
                }
            }
        }
        Err(FetchError::Network(detail)) => {
            warn!("price request failed: {}", detail);
            display.show_error("Connection Error".to_string());
        }
        Err(err) => {
            warn!("price update failed: {}", err);
            display.show_error("Error".to_string());
        }
    }
}
