use clock_core::{format_mm_ss_cs, Lap, TimerState, ZERO_DISPLAY};

use crate::stopwatch::TimerEvent;

/// What the lap button does right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LapAction {
    Lap,
    Clear,
}

impl LapAction {
    pub fn label(self) -> &'static str {
        match self {
            LapAction::Lap => "Lap",
            LapAction::Clear => "Clear",
        }
    }
}

/// Button and list state of the timer screen.
pub struct TimerScreen {
    running: bool,
    paused: bool,
    display: String,
    laps: Vec<String>,
    pub lap_scroll_offset: usize,
}

impl TimerScreen {
    pub fn new() -> Self {
        Self {
            running: false,
            paused: false,
            display: ZERO_DISPLAY.to_string(),
            laps: Vec::new(),
            lap_scroll_offset: 0,
        }
    }

    /// Rebuild from the stopwatch when the screen is (re)entered.
    pub fn sync(&mut self, state: TimerState, elapsed_ms: u64, laps: &[Lap]) {
        self.running = state != TimerState::Idle;
        self.paused = state == TimerState::Paused;
        self.display = format_mm_ss_cs(elapsed_ms);
        self.laps = laps.iter().map(Lap::label).collect();
        self.lap_scroll_offset = 0;
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn laps(&self) -> &[String] {
        &self.laps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn start_enabled(&self) -> bool {
        !self.running
    }

    pub fn pause_enabled(&self) -> bool {
        self.running
    }

    pub fn stop_enabled(&self) -> bool {
        self.running
    }

    pub fn pause_label(&self) -> &'static str {
        if self.running && self.paused {
            "Continue"
        } else {
            "Pause"
        }
    }

    pub fn lap_action(&self) -> LapAction {
        if self.running {
            LapAction::Lap
        } else {
            LapAction::Clear
        }
    }

    pub fn on_started(&mut self) {
        self.running = true;
        self.paused = false;
    }

    pub fn on_pause_toggled(&mut self) {
        self.paused = !self.paused;
    }

    pub fn reset_flags(&mut self) {
        self.running = false;
        self.paused = false;
    }

    pub fn clear(&mut self) {
        self.laps.clear();
        self.lap_scroll_offset = 0;
        self.display = ZERO_DISPLAY.to_string();
        self.reset_flags();
    }

    pub fn apply(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Updated { elapsed } => self.display = elapsed,
            TimerEvent::LapRecorded { lap, index } => {
                self.laps.push(format!("Lap {} - {}", index, lap));
            }
            TimerEvent::Stopped => self.reset_flags(),
        }
    }
}
