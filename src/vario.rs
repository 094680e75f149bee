use serde::Serialize;

use crate::audio::{BipCadence, Feedback, ToneDecision, ToneMapper};
use crate::config::VarioConfig;
use crate::constants::MAX_VOLUME;
use crate::error::{Result, VarioError};
use crate::hal::Board;
use crate::menu::{ButtonCode, ButtonMenu, MenuOutcome};
use crate::settings::{Settings, SettingsStore};
use crate::signal_processing::{FilterState, PressureFilter};

/// Everything one control cycle observed and decided
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    /// Board clock when the cycle started
    pub time_ms: u64,
    pub pressure: f32,
    pub tone_frequency: f32,
    pub dds_acc: i16,
    pub decision: ToneDecision,
    pub buttons: ButtonCode,
    pub menu: MenuOutcome,
}

/// The variometer control loop
///
/// Owns the board, the settings store and all per-run state. One call to
/// [`Vario::cycle`] reads the sensor, drives the tone and LEDs, services the
/// buttons and then waits for the loop period.
pub struct Vario<B: Board, S: SettingsStore> {
    board: B,
    store: S,
    settings: Settings,
    filter: PressureFilter,
    cadence: BipCadence,
    mapper: ToneMapper,
    menu: ButtonMenu,
    feedback: Feedback,
    period_ms: u32,
    cycles: u64,
}

impl<B: Board, S: SettingsStore> Vario<B, S> {
    /// Load the settings (repairing a corrupted store) and set up the pipeline
    pub fn new(board: B, mut store: S, config: &VarioConfig) -> Self {
        let settings = Settings::load(&mut store);

        Self {
            board,
            store,
            settings,
            filter: PressureFilter::new(&config.filter),
            cadence: BipCadence::new(config.tone.dds_step_scale, config.tone.dds_step_offset),
            mapper: ToneMapper::new(&config.tone),
            menu: ButtonMenu::new(&config.menu, &config.feedback),
            feedback: Feedback::new(&config.feedback),
            period_ms: config.control.period_ms,
            cycles: 0,
        }
    }

    /// Boot self-test: announce power-on, then bring up the pressure sensor
    ///
    /// On failure the fault is signalled (two alerts, error LED left on) and
    /// the error returned; the caller must not run cycles afterwards.
    pub fn power_on(&mut self) -> Result<()> {
        self.feedback.power_on(&mut self.board);

        match self.board.init() {
            Ok(()) => {
                self.feedback.confirm_at(&mut self.board, MAX_VOLUME);
                match self.board.info() {
                    Some(info) => log::info!("Pressure sensor ready: {}", info),
                    None => log::info!("Pressure sensor ready"),
                }
                Ok(())
            }
            Err(e) => {
                self.feedback.sensor_fault(&mut self.board);
                log::error!("{}; check the sensor wiring, address and supply", e);
                Err(match e {
                    VarioError::SensorInit(_) => e,
                    other => VarioError::SensorInit(other.to_string()),
                })
            }
        }
    }

    /// Stop all processing and signal the fault forever
    pub fn halt(&mut self) -> ! {
        log::error!("Halted");
        loop {
            self.feedback.fault_beat(&mut self.board);
        }
    }

    /// Run one control cycle
    pub fn cycle(&mut self) -> CycleReport {
        let time_ms = self.board.now_ms();
        let pressure = self.board.read_pressure();
        let tone_frequency = self.filter.update(pressure);

        let decision = self
            .mapper
            .evaluate(tone_frequency, &mut self.cadence, &self.settings);
        decision.apply(&mut self.board);

        let buttons = self.board.read_buttons();
        let menu = self.menu.handle(
            buttons,
            &mut self.settings,
            &mut self.board,
            &mut self.store,
        );

        log::trace!(
            "cycle {}: p={:.4} f={:.2} dds={} {:?}",
            self.cycles,
            pressure,
            tone_frequency,
            self.cadence.value(),
            decision.kind
        );
        if !menu.is_nothing() {
            log::debug!("cycle {}: {} -> {:?}", self.cycles, buttons, menu);
        }

        let report = CycleReport {
            cycle: self.cycles,
            time_ms,
            pressure,
            tone_frequency,
            dds_acc: self.cadence.value(),
            decision,
            buttons,
            menu,
        };

        self.cycles += 1;
        self.board.delay_ms(self.period_ms);
        report
    }

    /// Run `count` cycles, handing each report to `on_cycle`
    pub fn run<F: FnMut(&CycleReport)>(&mut self, count: u64, mut on_cycle: F) {
        for _ in 0..count {
            let report = self.cycle();
            on_cycle(&report);
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn filter_state(&self) -> FilterState {
        self.filter.state()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down, returning the board and store
    pub fn into_parts(self) -> (B, S) {
        (self.board, self.store)
    }
}
