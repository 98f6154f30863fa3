mod clock;
mod error;
mod nav;
mod settings;
mod stopwatch;
mod storage;
mod ticker;
mod timer_screen;
mod ui;
mod zones;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use clock_core::TimerState;
use flume::Sender;
use num_traits::FromPrimitive;

use crate::clock::ClockFace;
use crate::nav::{Navigator, Screen};
use crate::settings::SettingsScreen;
use crate::stopwatch::{Stopwatch, TimerEvent};
use crate::storage::{ClockPreferences, PreferenceStore};
use crate::ticker::Ticker;
use crate::timer_screen::{LapAction, TimerScreen};

const KEY_ENTER: char = '\n';
const SETTINGS_PAGE: isize = 10;
// Stopwatch updates arrive far faster than a terminal should repaint
const REDRAW_MIN_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "clock", version, about)]
struct Cli {
    /// Preferences file (defaults to the per-user config location)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stopwatch tick interval in milliseconds
    #[arg(long, default_value_t = stopwatch::DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Clock screen refresh interval in milliseconds
    #[arg(long, default_value_t = clock::DEFAULT_REFRESH_MS, value_parser = clap::value_parser!(u64).range(1..))]
    clock_refresh_ms: u64,

    /// Print frames one after another instead of redrawing in place
    #[arg(long)]
    plain: bool,
}

#[derive(Debug)]
enum AppOp {
    Keys(String),
    ClockRefresh,
    // Tagged with the subscription it came from
    Timer(u64, TimerEvent),
    Quit,
}

struct ClockApp {
    nav: Navigator,
    storage: PreferenceStore,
    prefs: ClockPreferences,
    system_zone: Tz,

    stopwatch: Stopwatch,
    timer_screen: TimerScreen,
    timer_epoch: u64,
    settings: Option<SettingsScreen>,

    app_tx: Sender<AppOp>,
    clock_refresh: Duration,
    clock_pump: Option<Ticker>,
    plain: bool,
    last_draw: Option<Instant>,
    // Menu overlay state
    menu_visible: bool,
    menu_cursor: usize,
    help_visible: bool,
    quit: bool,
}

impl ClockApp {
    fn new(cli: &Cli, app_tx: Sender<AppOp>) -> Self {
        let storage = PreferenceStore::new(cli.config.clone());
        let prefs = storage.load_or_default();
        let system_zone = zones::system_zone();
        log::info!(
            "system zone {}, saved zone {:?}",
            system_zone.name(),
            prefs.selected_timezone
        );

        Self {
            nav: Navigator::new(),
            storage,
            prefs,
            system_zone,
            stopwatch: Stopwatch::new(Duration::from_millis(cli.tick_ms)),
            timer_screen: TimerScreen::new(),
            timer_epoch: 0,
            settings: None,
            app_tx,
            clock_refresh: Duration::from_millis(cli.clock_refresh_ms),
            clock_pump: None,
            plain: cli.plain,
            last_draw: None,
            menu_visible: false,
            menu_cursor: 0,
            help_visible: false,
            quit: false,
        }
    }

    fn clock_face(&self) -> ClockFace {
        let tz = zones::resolve(self.prefs.selected_timezone.as_deref(), self.system_zone);
        ClockFace::at(Utc::now(), tz)
    }

    fn redraw(&mut self) {
        let frame = if self.help_visible {
            ui::draw_help(self.help_text())
        } else if self.menu_visible {
            ui::draw_menu(&Screen::ALL, self.menu_cursor)
        } else {
            match self.nav.current() {
                Screen::Clock => ui::draw_clock(&self.clock_face()),
                Screen::Timer => ui::draw_timer(&self.timer_screen),
                Screen::Settings => match &self.settings {
                    Some(settings) => ui::draw_settings(settings),
                    None => return,
                },
                Screen::About => ui::draw_about(),
            }
        };

        let mut stdout = std::io::stdout().lock();
        let written = stdout
            .write_all(ui::present(&frame, self.plain).as_bytes())
            .and_then(|_| stdout.flush());
        if let Err(e) = written {
            log::warn!("can't draw frame: {}", e);
        }
        self.last_draw = Some(Instant::now());
    }

    fn redraw_throttled(&mut self) {
        let due = self
            .last_draw
            .map(|t| t.elapsed() >= REDRAW_MIN_INTERVAL)
            .unwrap_or(true);
        if due {
            self.redraw();
        }
    }

    fn start_clock_pump(&mut self) {
        if self.clock_pump.is_some() {
            return;
        }
        let tx = self.app_tx.clone();
        match Ticker::spawn("clock-refresh", self.clock_refresh, move || {
            tx.send(AppOp::ClockRefresh).is_ok()
        }) {
            Ok(ticker) => self.clock_pump = Some(ticker),
            Err(e) => log::error!("can't start clock refresh: {}", e),
        }
    }

    fn stop_clock_pump(&mut self) {
        if let Some(ticker) = self.clock_pump.take() {
            ticker.cancel();
        }
    }

    fn enter_screen(&mut self, screen: Screen) {
        log::debug!("enter {}", screen.title());
        match screen {
            Screen::Clock => self.start_clock_pump(),
            Screen::Timer => {
                self.timer_screen.sync(
                    self.stopwatch.state(),
                    self.stopwatch.elapsed_ms(),
                    &self.stopwatch.laps(),
                );
                let tx = self.app_tx.clone();
                let epoch = self.timer_epoch;
                let subscribed = self.stopwatch.subscribe(Box::new(move |event| {
                    tx.send(AppOp::Timer(epoch, event)).ok();
                }));
                if let Err(e) = subscribed {
                    log::error!("timer screen: {}", e);
                }
            }
            Screen::Settings => {
                let now = Utc::now();
                self.settings = Some(SettingsScreen::new(
                    zones::catalogue(now),
                    zones::label_for(self.system_zone, now),
                    self.prefs.selected_timezone.as_deref(),
                ));
            }
            Screen::About => {}
        }
    }

    fn leave_screen(&mut self, screen: Screen) {
        log::debug!("leave {}", screen.title());
        match screen {
            Screen::Clock => self.stop_clock_pump(),
            Screen::Timer => {
                self.stopwatch.unsubscribe();
                // Events still queued from this subscription are stale now
                self.timer_epoch += 1;
            }
            Screen::Settings => self.settings = None,
            Screen::About => {}
        }
    }

    fn navigate_to(&mut self, screen: Screen) {
        self.leave_screen(self.nav.current());
        self.nav.navigate_to(screen);
        self.enter_screen(screen);
        self.redraw();
    }

    fn back(&mut self) {
        let leaving = self.nav.current();
        match self.nav.back() {
            Some(screen) => {
                self.leave_screen(leaving);
                self.enter_screen(screen);
                self.redraw();
            }
            None => self.quit = true,
        }
    }

    fn handle_op(&mut self, op: AppOp) {
        match op {
            AppOp::Keys(keys) => {
                for key in keys.chars() {
                    self.handle_key(key);
                    if self.quit {
                        break;
                    }
                }
            }
            AppOp::ClockRefresh => {
                // Late refreshes after leaving the clock are dropped
                if self.nav.current() == Screen::Clock && !self.menu_visible && !self.help_visible {
                    self.redraw();
                }
            }
            AppOp::Timer(epoch, event) => {
                if epoch != self.timer_epoch || self.nav.current() != Screen::Timer {
                    return;
                }
                let is_tick = matches!(event, TimerEvent::Updated { .. });
                self.timer_screen.apply(event);
                if self.menu_visible || self.help_visible {
                    return;
                }
                // The last tick before a pause or stop must reach the screen
                if is_tick && self.stopwatch.state() == TimerState::Running {
                    self.redraw_throttled();
                } else {
                    self.redraw();
                }
            }
            AppOp::Quit => self.quit = true,
        }
    }

    fn handle_key(&mut self, key: char) {
        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            self.redraw();
            return;
        }

        // If menu is open, handle menu navigation only
        if self.menu_visible {
            match key {
                'k' => {
                    if self.menu_cursor > 0 {
                        self.menu_cursor -= 1;
                        self.redraw();
                    }
                }
                'j' => {
                    if self.menu_cursor + 1 < Screen::ALL.len() {
                        self.menu_cursor += 1;
                        self.redraw();
                    }
                }
                KEY_ENTER => {
                    self.menu_visible = false;
                    match Screen::from_usize(self.menu_cursor) {
                        Some(screen) => self.navigate_to(screen),
                        None => self.redraw(),
                    }
                }
                'm' => {
                    self.menu_visible = false;
                    self.redraw();
                }
                _ => {}
            }
            return;
        }

        match key {
            'm' => {
                self.menu_visible = true;
                self.menu_cursor = 0;
                self.redraw();
                return;
            }
            '?' => {
                self.help_visible = true;
                self.redraw();
                return;
            }
            'a' => {
                if self.nav.current() != Screen::About {
                    self.navigate_to(Screen::About);
                }
                return;
            }
            'b' => {
                self.back();
                return;
            }
            'q' => {
                self.quit = true;
                return;
            }
            _ => {}
        }

        match self.nav.current() {
            Screen::Clock => self.handle_key_clock(key),
            Screen::Timer => self.handle_key_timer(key),
            Screen::Settings => self.handle_key_settings(key),
            Screen::About => {}
        }
    }

    fn handle_key_clock(&mut self, key: char) {
        match key {
            't' => self.navigate_to(Screen::Timer),
            's' => self.navigate_to(Screen::Settings),
            _ => {}
        }
    }

    fn handle_key_timer(&mut self, key: char) {
        match key {
            's' => {
                if !self.timer_screen.start_enabled() {
                    return;
                }
                match self.stopwatch.start() {
                    Ok(true) => self.timer_screen.on_started(),
                    Ok(false) => {}
                    Err(e) => log::error!("{}: {:?}", e, std::error::Error::source(&e)),
                }
            }
            'p' => {
                if !self.timer_screen.pause_enabled() {
                    return;
                }
                let toggled = if self.timer_screen.is_paused() {
                    match self.stopwatch.resume() {
                        Ok(resumed) => resumed,
                        Err(e) => {
                            log::error!("{}: {:?}", e, std::error::Error::source(&e));
                            false
                        }
                    }
                } else {
                    self.stopwatch.pause()
                };
                if toggled {
                    self.timer_screen.on_pause_toggled();
                }
            }
            'x' => {
                if !self.timer_screen.stop_enabled() {
                    return;
                }
                self.stopwatch.stop();
                self.timer_screen.reset_flags();
            }
            'l' => match self.timer_screen.lap_action() {
                LapAction::Lap => {
                    // The lap reaches the list through the subscriber
                    self.stopwatch.record_lap();
                }
                LapAction::Clear => {
                    self.stopwatch.clear_laps();
                    self.timer_screen.clear();
                }
            },
            'j' => {
                if self.timer_screen.lap_scroll_offset + 1 < self.timer_screen.laps().len() {
                    self.timer_screen.lap_scroll_offset += 1;
                }
            }
            'k' => {
                self.timer_screen.lap_scroll_offset =
                    self.timer_screen.lap_scroll_offset.saturating_sub(1);
            }
            _ => return,
        }
        self.redraw();
    }

    fn handle_key_settings(&mut self, key: char) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        match key {
            'k' => settings.move_by(-1),
            'j' => settings.move_by(1),
            'K' => settings.move_by(-SETTINGS_PAGE),
            'J' => settings.move_by(SETTINGS_PAGE),
            'w' | KEY_ENTER => {
                let label = settings.label_to_save();
                match self.storage.save_selected_timezone(&label) {
                    Ok(prefs) => {
                        self.prefs = prefs;
                        settings.status = Some(format!("Saved {}", label));
                    }
                    Err(e) => {
                        log::error!("{}: {:?}", e, std::error::Error::source(&e));
                        settings.status = Some(format!("Could not save: {}", e));
                    }
                }
            }
            _ => return,
        }
        self.redraw();
    }

    fn help_text(&self) -> &'static str {
        match self.nav.current() {
            Screen::Clock => {
                "CLOCK HELP\n\n\
                 t      Timer\n\
                 s      Settings\n\
                 a      About\n\
                 m      Menu\n\
                 q      Quit"
            }
            Screen::Timer => {
                "TIMER HELP\n\n\
                 s      Start\n\
                 p      Pause/Continue\n\
                 x      Stop\n\
                 l      Lap (running) / Clear (stopped)\n\
                 j/k    Scroll laps\n\
                 b      Back"
            }
            Screen::Settings => {
                "SETTINGS HELP\n\n\
                 j/k    Move cursor\n\
                 J/K    Move a page\n\
                 w      Save timezone\n\
                 b      Back"
            }
            Screen::About => {
                "ABOUT HELP\n\n\
                 m      Menu\n\
                 b      Back"
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(ticker) = self.clock_pump.take() {
            ticker.join();
        }
        self.stopwatch.unsubscribe();
        self.stopwatch.stop();
    }
}

fn spawn_input_thread(tx: Sender<AppOp>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        log::error!("can't read input: {}", e);
                        break;
                    }
                };
                // A bare return is the Enter key
                let keys = match line.trim() {
                    "" => KEY_ENTER.to_string(),
                    keys => keys.to_string(),
                };
                if tx.send(AppOp::Keys(keys)).is_err() {
                    return;
                }
            }
            tx.send(AppOp::Quit).ok();
        })?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {}", e))?;

    let cli = Cli::parse();
    log::info!("Clock starting, tick {} ms", cli.tick_ms);

    let (app_tx, app_rx) = flume::unbounded();
    spawn_input_thread(app_tx.clone()).context("can't start input thread")?;

    let mut app = ClockApp::new(&cli, app_tx);
    app.enter_screen(Screen::Clock);
    app.redraw();

    while let Ok(op) = app_rx.recv() {
        app.handle_op(op);
        if app.quit {
            break;
        }
    }

    app.shutdown();
    log::info!("Clock exiting");
    Ok(())
}
