use serde::Serialize;

use super::ButtonCode;
use crate::audio::Feedback;
use crate::config::{FeedbackConfig, MenuConfig};
use crate::constants::{MAX_SENS, MAX_VOLUME, MIN_SENS, MIN_VOLUME};
use crate::hal::{ButtonInput, Outputs};
use crate::settings::{Settings, SettingsField, SettingsStore};

/// State carried from one menu call to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    Idle,
    /// The last Select gesture adjusted the sensitivity; the next Select
    /// release must not toggle falling mode
    SensitivityJustAdjusted,
}

/// What one menu call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MenuOutcome {
    /// No settings gesture
    Nothing,
    VolumeChanged { volume: u8 },
    VolumeLimit { volume: u8 },
    SensitivityChanged { sensitivity: i8 },
    SensitivityLimit { sensitivity: i8 },
    /// Select released right after a sensitivity change
    ToggleSuppressed,
    FallingToggled { enabled: bool },
    /// Gave up waiting for Select to be released
    ReleaseTimedOut,
}

impl MenuOutcome {
    pub fn is_nothing(&self) -> bool {
        matches!(self, MenuOutcome::Nothing)
    }
}

/// Three-button settings menu
///
/// Called once per control cycle with the buttons read that cycle:
///
/// * Up / Down adjust the volume.
/// * A Select gesture silences the outputs and blocks until the buttons stop
///   reading exactly Select. Select+Up / Select+Down then step the
///   sensitivity; a plain release toggles falling mode, unless the previous
///   gesture changed the sensitivity.
///
/// Every change is persisted immediately. Store failures are logged and the
/// in-memory value is kept.
pub struct ButtonMenu {
    config: MenuConfig,
    feedback: Feedback,
    state: MenuState,
}

impl ButtonMenu {
    pub fn new(config: &MenuConfig, feedback: &FeedbackConfig) -> Self {
        Self {
            config: config.clone(),
            feedback: Feedback::new(feedback),
            state: MenuState::Idle,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Process the buttons read this cycle
    pub fn handle<B, S>(
        &mut self,
        code: ButtonCode,
        settings: &mut Settings,
        board: &mut B,
        store: &mut S,
    ) -> MenuOutcome
    where
        B: ButtonInput + Outputs + ?Sized,
        S: SettingsStore + ?Sized,
    {
        if !code.is_select_gesture() {
            return self.adjust_volume(code, settings, board, store);
        }

        self.feedback.silence(board);

        let Some(code) = self.wait_for_release(board) else {
            log::warn!(
                "Select still held after {} ms, abandoning gesture",
                self.config.release_timeout_ms.unwrap_or_default()
            );
            return MenuOutcome::ReleaseTimedOut;
        };

        match code {
            ButtonCode::SelectUp | ButtonCode::SelectDown => {
                let outcome = self.adjust_sensitivity(code, settings, board, store);
                self.state = MenuState::SensitivityJustAdjusted;
                board.delay_ms(self.config.debounce_ms);
                outcome
            }
            _ if self.state == MenuState::SensitivityJustAdjusted => {
                log::debug!("Select released after sensitivity change, keeping falling mode");
                self.state = MenuState::Idle;
                MenuOutcome::ToggleSuppressed
            }
            _ => self.toggle_falling(settings, board, store),
        }
    }

    /// Poll until the buttons read anything but Select alone
    ///
    /// Blocks the control loop. Returns `None` only when a release timeout is
    /// configured and expires.
    fn wait_for_release<B: ButtonInput + Outputs + ?Sized>(
        &self,
        board: &mut B,
    ) -> Option<ButtonCode> {
        let mut waited_ms: u32 = 0;
        loop {
            let code = board.read_buttons();
            if code != ButtonCode::Select {
                return Some(code);
            }
            if let Some(timeout) = self.config.release_timeout_ms {
                if waited_ms >= timeout {
                    return None;
                }
            }
            board.delay_ms(self.config.poll_interval_ms);
            waited_ms = waited_ms.saturating_add(self.config.poll_interval_ms);
        }
    }

    fn adjust_volume<B, S>(
        &mut self,
        code: ButtonCode,
        settings: &mut Settings,
        board: &mut B,
        store: &mut S,
    ) -> MenuOutcome
    where
        B: Outputs + ?Sized,
        S: SettingsStore + ?Sized,
    {
        let last_volume = settings.volume;

        let outcome = match code {
            ButtonCode::Up if settings.volume < MAX_VOLUME => {
                settings.volume += 1;
                self.feedback.confirm_at(board, settings.volume);
                MenuOutcome::VolumeChanged {
                    volume: settings.volume,
                }
            }
            ButtonCode::Down if settings.volume > MIN_VOLUME => {
                settings.volume -= 1;
                self.feedback.confirm_at(board, settings.volume);
                MenuOutcome::VolumeChanged {
                    volume: settings.volume,
                }
            }
            ButtonCode::Up | ButtonCode::Down => {
                self.feedback.limit(board);
                MenuOutcome::VolumeLimit {
                    volume: settings.volume,
                }
            }
            _ => MenuOutcome::Nothing,
        };

        if settings.volume != last_volume {
            log::info!("Volume {} -> {}", last_volume, settings.volume);
            persist(settings, store, SettingsField::Volume);
        }
        outcome
    }

    fn adjust_sensitivity<B, S>(
        &mut self,
        code: ButtonCode,
        settings: &mut Settings,
        board: &mut B,
        store: &mut S,
    ) -> MenuOutcome
    where
        B: Outputs + ?Sized,
        S: SettingsStore + ?Sized,
    {
        let step = self.config.sensitivity_step;
        let last_sensitivity = settings.sensitivity;
        let mut at_limit = false;

        match code {
            ButtonCode::SelectUp => {
                if settings.sensitivity < MAX_SENS {
                    settings.sensitivity = settings.sensitivity.saturating_add(step).min(MAX_SENS);
                } else {
                    at_limit = true;
                }
            }
            ButtonCode::SelectDown => {
                if settings.sensitivity > MIN_SENS {
                    settings.sensitivity = settings.sensitivity.saturating_sub(step).max(MIN_SENS);
                } else {
                    at_limit = true;
                }
            }
            _ => {}
        }

        self.feedback
            .sensitivity_ticks(board, tick_count(settings.sensitivity, step));

        if at_limit {
            self.feedback.limit(board);
        }

        if settings.sensitivity != last_sensitivity {
            log::info!("Sensitivity {} -> {}", last_sensitivity, settings.sensitivity);
            persist(settings, store, SettingsField::Sensitivity);
        }

        if at_limit {
            MenuOutcome::SensitivityLimit {
                sensitivity: settings.sensitivity,
            }
        } else {
            MenuOutcome::SensitivityChanged {
                sensitivity: settings.sensitivity,
            }
        }
    }

    fn toggle_falling<B, S>(
        &mut self,
        settings: &mut Settings,
        board: &mut B,
        store: &mut S,
    ) -> MenuOutcome
    where
        B: Outputs + ?Sized,
        S: SettingsStore + ?Sized,
    {
        let was_enabled = settings.falling_enabled;
        settings.falling_enabled = !was_enabled;
        log::info!("Falling mode {}", if was_enabled { "off" } else { "on" });
        persist(settings, store, SettingsField::Falling);

        if was_enabled {
            self.feedback.falling_disabled(board);
        } else {
            self.feedback.falling_enabled(board, settings.volume);
        }

        MenuOutcome::FallingToggled {
            enabled: settings.falling_enabled,
        }
    }
}

/// One tick per started step up to the sensitivity: 10 -> 1, 20 -> 2, 40 -> 4
fn tick_count(sensitivity: i8, step: i8) -> usize {
    if sensitivity <= 0 {
        return 0;
    }
    let (sensitivity, step) = (sensitivity as usize, step as usize);
    sensitivity.div_ceil(step)
}

fn persist<S: SettingsStore + ?Sized>(settings: &Settings, store: &mut S, field: SettingsField) {
    if let Err(e) = settings.save(store, field) {
        log::warn!("Could not persist {:?}: {}", field, e);
    }
}
