//! Pure stopwatch logic and display formatting with no platform dependencies.
//! Testable on host; the app drives it from its ticker thread.

/// What the timer display shows when nothing has been measured.
pub const ZERO_DISPLAY: &str = "00:00:00";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// One recorded lap. `index` is 1-based.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    pub index: u32,
    pub duration_ms: u64,
}

impl Lap {
    /// "Lap N - mm:ss:cc", as listed on the timer screen.
    pub fn label(&self) -> String {
        format!("Lap {} - {}", self.index, format_mm_ss_cs(self.duration_ms))
    }
}

/// Tick-driven stopwatch. Elapsed time only moves through [`StopwatchCore::tick`],
/// so it can never advance outside the Running state.
///
/// Every transition returns whether it took effect; invalid transitions are
/// no-ops.
#[derive(Debug)]
pub struct StopwatchCore {
    state: TimerState,
    elapsed_ms: u64,
    last_lap_ms: u64,
    lap_count: u32,
    laps: Vec<Lap>,
}

impl Default for StopwatchCore {
    fn default() -> Self {
        Self::new()
    }
}

impl StopwatchCore {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_ms: 0,
            last_lap_ms: 0,
            lap_count: 0,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn last_lap_ms(&self) -> u64 {
        self.last_lap_ms
    }

    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.state = TimerState::Running;
        true
    }

    /// Back to Idle with counters zeroed. Recorded laps stay until
    /// [`StopwatchCore::clear_laps`].
    pub fn stop(&mut self) -> bool {
        if self.state == TimerState::Idle {
            return false;
        }
        self.state = TimerState::Idle;
        self.elapsed_ms = 0;
        self.last_lap_ms = 0;
        self.lap_count = 0;
        true
    }

    /// Advance by one tick. Returns the new elapsed time, or `None` when not running.
    pub fn tick(&mut self, interval_ms: u64) -> Option<u64> {
        if self.state != TimerState::Running {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(interval_ms);
        Some(self.elapsed_ms)
    }

    pub fn record_lap(&mut self) -> Option<Lap> {
        if self.state != TimerState::Running {
            return None;
        }
        self.lap_count += 1;
        let lap = Lap {
            index: self.lap_count,
            duration_ms: self.elapsed_ms - self.last_lap_ms,
        };
        self.last_lap_ms = self.elapsed_ms;
        self.laps.push(lap);
        Some(lap)
    }

    pub fn clear_laps(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.laps.clear();
        self.elapsed_ms = 0;
        true
    }
}

/// Format milliseconds as "mm:ss:cc" (minutes, seconds, centiseconds).
/// Minutes are not wrapped into hours.
pub fn format_mm_ss_cs(ms: u64) -> String {
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    let cs = (ms % 1000) / 10;
    format!("{:02}:{:02}:{:02}", m, s, cs)
}

/// Zone label as stored in preferences: "GMT+2 (Europe/Kyiv)".
pub fn zone_label(offset_hours: i32, zone_id: &str) -> String {
    let sign = if offset_hours >= 0 { "+" } else { "" };
    format!("GMT{}{} ({})", sign, offset_hours, zone_id)
}

/// Pull the zone id back out of a label: the text after the first '(' up to
/// the next ')'. A missing delimiter keeps the text on that side, so a bare
/// "UTC" yields "UTC".
pub fn zone_id_from_label(label: &str) -> Option<&str> {
    let after = match label.find('(') {
        Some(i) => &label[i + 1..],
        None => label,
    };
    let id = match after.find(')') {
        Some(i) => &after[..i],
        None => after,
    };
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u64 = 10;

    fn ticks(sw: &mut StopwatchCore, n: usize) {
        for _ in 0..n {
            sw.tick(TICK);
        }
    }

    #[test]
    fn test_stopwatch_basic() {
        let mut sw = StopwatchCore::new();
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.elapsed_ms(), 0);

        assert!(sw.start());
        assert_eq!(sw.state(), TimerState::Running);
        ticks(&mut sw, 5);
        assert_eq!(sw.elapsed_ms(), 50);

        assert!(sw.pause());
        assert_eq!(sw.state(), TimerState::Paused);
        assert_eq!(sw.tick(TICK), None);
        assert_eq!(sw.elapsed_ms(), 50); // frozen while paused

        assert!(sw.resume());
        ticks(&mut sw, 2);
        assert_eq!(sw.elapsed_ms(), 70);

        assert!(sw.stop());
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.elapsed_ms(), 0);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut sw = StopwatchCore::new();
        assert!(!sw.pause());
        assert!(!sw.resume());
        assert!(!sw.stop());
        assert_eq!(sw.record_lap(), None);
        assert_eq!(sw.state(), TimerState::Idle);

        sw.start();
        assert!(!sw.start());
        assert!(!sw.resume());
        assert!(!sw.clear_laps());

        sw.pause();
        assert!(!sw.pause());
        assert!(!sw.start());
        assert_eq!(sw.record_lap(), None);
        assert!(!sw.clear_laps());
        assert_eq!(sw.state(), TimerState::Paused);
    }

    #[test]
    fn test_elapsed_only_advances_while_running() {
        let mut sw = StopwatchCore::new();
        let mut expected = 0;
        // start, pause, resume, pause, resume, with ticks arriving in every state
        let script: [(fn(&mut StopwatchCore) -> bool, bool); 5] = [
            (StopwatchCore::start, true),
            (StopwatchCore::pause, false),
            (StopwatchCore::resume, true),
            (StopwatchCore::pause, false),
            (StopwatchCore::resume, true),
        ];
        for (action, running_after) in script {
            action(&mut sw);
            for _ in 0..3 {
                let before = sw.elapsed_ms();
                sw.tick(TICK);
                if running_after {
                    expected += TICK;
                    assert!(sw.elapsed_ms() > before);
                } else {
                    assert_eq!(sw.elapsed_ms(), before);
                }
            }
        }
        assert_eq!(sw.elapsed_ms(), expected);
    }

    #[test]
    fn test_lap_after_three_ticks() {
        let mut sw = StopwatchCore::new();
        sw.start();
        ticks(&mut sw, 3);

        let lap = sw.record_lap().unwrap();
        assert_eq!(sw.elapsed_ms(), 3 * TICK);
        assert_eq!(lap, Lap { index: 1, duration_ms: 3 * TICK });
        assert_eq!(sw.last_lap_ms(), 3 * TICK);
    }

    #[test]
    fn test_lap_is_delta_since_previous_lap() {
        let mut sw = StopwatchCore::new();
        sw.start();
        ticks(&mut sw, 500);
        let lap1 = sw.record_lap().unwrap();
        assert_eq!(lap1.duration_ms, 5000);

        ticks(&mut sw, 300);
        let lap2 = sw.record_lap().unwrap();
        assert_eq!(lap2, Lap { index: 2, duration_ms: 3000 });

        // Elapsed keeps running across laps
        assert_eq!(sw.elapsed_ms(), 8000);
        assert_eq!(sw.laps(), &[lap1, lap2]);
    }

    #[test]
    fn test_pause_excludes_paused_interval_from_lap() {
        let mut sw = StopwatchCore::new();
        sw.start();
        ticks(&mut sw, 4);
        sw.pause();
        ticks(&mut sw, 100);
        sw.resume();
        ticks(&mut sw, 2);

        assert_eq!(sw.elapsed_ms(), 6 * TICK);
        assert_eq!(sw.record_lap().unwrap().duration_ms, 6 * TICK);
    }

    #[test]
    fn test_stop_after_two_laps_then_clear() {
        let mut sw = StopwatchCore::new();
        sw.start();
        ticks(&mut sw, 2);
        sw.record_lap();
        ticks(&mut sw, 2);
        sw.record_lap();
        assert_eq!(sw.lap_count(), 2);

        assert!(sw.stop());
        assert_eq!(sw.lap_count(), 0);
        assert_eq!(sw.last_lap_ms(), 0);
        assert_eq!(sw.elapsed_ms(), 0);
        assert_eq!(sw.laps().len(), 2);

        assert!(sw.clear_laps());
        assert!(sw.laps().is_empty());

        // Lap numbering restarts after a stop
        sw.start();
        sw.tick(TICK);
        assert_eq!(sw.record_lap().unwrap().index, 1);
    }

    #[test]
    fn test_stop_from_paused_resets() {
        let mut sw = StopwatchCore::new();
        sw.start();
        ticks(&mut sw, 7);
        sw.record_lap();
        sw.pause();
        assert!(sw.stop());
        assert_eq!(sw.elapsed_ms(), 0);
        assert_eq!(sw.lap_count(), 0);
        assert_eq!(sw.state(), TimerState::Idle);
    }

    #[test]
    fn test_format_mm_ss_cs() {
        assert_eq!(format_mm_ss_cs(0), ZERO_DISPLAY);
        assert_eq!(format_mm_ss_cs(12_340), "00:12:34");
        assert_eq!(format_mm_ss_cs(61_009), "01:01:00");
        assert_eq!(format_mm_ss_cs(125 * 60_000), "125:00:00");
    }

    #[test]
    fn test_lap_label() {
        let lap = Lap { index: 3, duration_ms: 1_500 };
        assert_eq!(lap.label(), "Lap 3 - 00:01:50");
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(zone_label(0, "UTC"), "GMT+0 (UTC)");
        assert_eq!(zone_label(-5, "America/New_York"), "GMT-5 (America/New_York)");
        assert_eq!(zone_label(9, "Asia/Tokyo"), "GMT+9 (Asia/Tokyo)");
    }

    #[test]
    fn test_zone_id_from_label() {
        assert_eq!(zone_id_from_label("GMT+2 (Europe/Kyiv)"), Some("Europe/Kyiv"));
        assert_eq!(zone_id_from_label("GMT-5 (America/New_York)"), Some("America/New_York"));
        assert_eq!(zone_id_from_label("UTC"), Some("UTC"));
        assert_eq!(zone_id_from_label("GMT+0 ()"), None);
        assert_eq!(zone_id_from_label(""), None);
    }
}
