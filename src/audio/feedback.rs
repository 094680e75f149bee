use crate::config::FeedbackConfig;
use crate::constants::MAX_VOLUME;
use crate::hal::Outputs;

/// Audible and visual feedback patterns
///
/// Every pattern is blocking: it plays to completion through the board's
/// delay before returning, and leaves the buzzer and LEDs off unless stated
/// otherwise.
#[derive(Debug, Clone)]
pub struct Feedback {
    config: FeedbackConfig,
}

impl Feedback {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Stop the tone and turn both LEDs off
    pub fn silence<B: Outputs + ?Sized>(&self, board: &mut B) {
        board.stop_tone();
        board.set_good(false);
        board.set_error(false);
    }

    /// Short bip with the good LED lit
    pub fn confirm<B: Outputs + ?Sized>(&self, board: &mut B, volume: u8, frequency_hz: u16) {
        self.silence(board);
        board.set_good(true);
        board.play_tone(frequency_hz, volume);
        board.delay_ms(self.config.confirm_ms);
        board.stop_tone();
        board.set_good(false);
    }

    /// Standard confirmation at the given volume
    pub fn confirm_at<B: Outputs + ?Sized>(&self, board: &mut B, volume: u8) {
        self.confirm(board, volume, self.config.confirm_hz);
    }

    /// Loud alert with the error LED lit: a setting is at its floor or ceiling
    pub fn limit<B: Outputs + ?Sized>(&self, board: &mut B) {
        self.silence(board);
        board.set_error(true);
        board.play_tone(self.config.limit_hz, MAX_VOLUME);
        board.delay_ms(self.config.limit_ms);
        board.stop_tone();
        board.set_error(false);
    }

    /// One high tick per sensitivity step
    pub fn sensitivity_ticks<B: Outputs + ?Sized>(&self, board: &mut B, count: usize) {
        for _ in 0..count {
            self.confirm(board, MAX_VOLUME, self.config.sensitivity_tick_hz);
            board.delay_ms(self.config.sensitivity_tick_gap_ms);
        }
    }

    /// Two confirmations: the sink tone was switched off
    pub fn falling_disabled<B: Outputs + ?Sized>(&self, board: &mut B) {
        self.confirm_at(board, MAX_VOLUME);
        board.delay_ms(self.config.double_confirm_gap_ms);
        self.confirm_at(board, MAX_VOLUME);
    }

    /// Confirmation followed by a descending sweep under the error LED:
    /// the sink tone was switched on
    pub fn falling_enabled<B: Outputs + ?Sized>(&self, board: &mut B, volume: u8) {
        self.confirm_at(board, MAX_VOLUME);

        board.set_error(true);
        let start = self.config.sweep_start_hz;
        let end = start.saturating_sub(self.config.sweep_span_hz);
        for frequency in ((end + 1)..=start).rev() {
            board.play_tone(frequency, volume);
            board.delay_ms(self.config.sweep_step_ms);
        }
        board.stop_tone();
        board.set_error(false);
    }

    /// Power-on bip, then a pause before the sensor comes up
    pub fn power_on<B: Outputs + ?Sized>(&self, board: &mut B) {
        self.confirm_at(board, MAX_VOLUME);
        board.delay_ms(self.config.boot_gap_ms);
    }

    /// Two alerts, then the error LED stays on
    pub fn sensor_fault<B: Outputs + ?Sized>(&self, board: &mut B) {
        self.limit(board);
        board.delay_ms(self.config.fault_gap_ms);
        self.limit(board);
        board.set_error(true);
    }

    /// One period of the halted-device signal. The error LED never goes out.
    pub fn fault_beat<B: Outputs + ?Sized>(&self, board: &mut B) {
        board.set_error(true);
        board.play_tone(self.config.limit_hz, MAX_VOLUME);
        board.delay_ms(self.config.limit_ms);
        board.stop_tone();
        board.delay_ms(self.config.limit_ms * 2);
    }
}
