use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::WidgetEvent;

/// How long a single "do not disturb" activation lasts.
pub const DND_DURATION: Duration = Duration::from_millis(3_600_000);

/// User-toggleable flags. Plain data, owned by the widget loop and never
/// shared across tasks; all flags reset to defaults on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceState {
    pub font_black: bool,
    pub sound_enabled: bool,
    pub do_not_disturb: bool,
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self {
            font_black: false,
            sound_enabled: true,
            do_not_disturb: false,
        }
    }
}

impl PreferenceState {
    pub fn toggle_font_color(&mut self) {
        self.font_black = !self.font_black;
    }

    /// Flips the sound flag. The caller beeps afterwards as confirmation,
    /// whatever the new value and regardless of do-not-disturb.
    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    /// The caller also schedules [`schedule_dnd_expiry`]; re-arming while
    /// already active stacks a second independent expiry, so the flag drops
    /// when the earliest pending expiry fires.
    pub fn enable_do_not_disturb(&mut self) {
        self.do_not_disturb = true;
    }

    pub fn disable_do_not_disturb(&mut self) {
        self.do_not_disturb = false;
    }
}

/// One-shot expiry task: posts `DndExpired` onto the widget channel after
/// exactly one hour. Each call spawns a fresh task; none are cancelled.
pub fn schedule_dnd_expiry(events: mpsc::Sender<WidgetEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(DND_DURATION).await;
        // Widget gone means nobody cares about the expiry anymore.
        let _ = events.send(WidgetEvent::DndExpired).await;
    })
}
