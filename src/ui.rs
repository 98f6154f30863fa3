use std::fmt::Write;

use crate::clock::ClockFace;
use crate::nav::Screen;
use crate::settings::SettingsScreen;
use crate::timer_screen::TimerScreen;

pub const FRAME_WIDTH: usize = 44;
const LAP_ROWS: usize = 8;
const ZONE_ROWS: usize = 11;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Prefix a frame with the ANSI clear/home sequence unless output is plain.
pub fn present(frame: &str, plain: bool) -> String {
    if plain {
        format!("{}\n", frame)
    } else {
        format!("{}{}", CLEAR_SCREEN, frame)
    }
}

fn rule(out: &mut String) {
    writeln!(out, "{}", "-".repeat(FRAME_WIDTH)).unwrap();
}

fn header(out: &mut String, title: &str) {
    rule(out);
    writeln!(out, " {:<width$}[?] [a]", title, width = FRAME_WIDTH - 9).unwrap();
    rule(out);
}

fn footer(out: &mut String, keys: &str) {
    rule(out);
    write!(out, " {}", keys).unwrap();
}

fn button(label: &str, key: char, enabled: bool) -> String {
    if enabled {
        format!("[{}] {}", key, label)
    } else {
        format!(" -  {}", label)
    }
}

pub fn draw_clock(face: &ClockFace) -> String {
    let mut out = String::new();
    header(&mut out, Screen::Clock.title());
    writeln!(out).unwrap();
    writeln!(out, "{:^width$}", face.time, width = FRAME_WIDTH).unwrap();
    writeln!(out, "{:^width$}", face.date, width = FRAME_WIDTH).unwrap();
    writeln!(out, "{:^width$}", face.zone, width = FRAME_WIDTH).unwrap();
    writeln!(out).unwrap();
    footer(&mut out, "t=timer  s=settings  m=menu  q=quit");
    out
}

pub fn draw_timer(state: &TimerScreen) -> String {
    let mut out = String::new();
    header(&mut out, Screen::Timer.title());
    writeln!(out).unwrap();
    writeln!(out, "{:^width$}", state.display(), width = FRAME_WIDTH).unwrap();
    writeln!(out).unwrap();

    let lap = state.lap_action();
    writeln!(
        out,
        " {}  {}  {}  {}",
        button("Start", 's', state.start_enabled()),
        button(state.pause_label(), 'p', state.pause_enabled()),
        button("Stop", 'x', state.stop_enabled()),
        button(lap.label(), 'l', true),
    )
    .unwrap();
    writeln!(out).unwrap();

    // Most recent lap first
    let laps = state.laps();
    let start = laps.len().saturating_sub(state.lap_scroll_offset);
    for line in laps[..start].iter().rev().take(LAP_ROWS) {
        writeln!(out, "   {}", line).unwrap();
    }
    if laps.len() > LAP_ROWS {
        writeln!(out, "   ({} laps, j/k to scroll)", laps.len()).unwrap();
    }

    footer(&mut out, "b=back  m=menu  ?=help");
    out
}

pub fn draw_settings(state: &SettingsScreen) -> String {
    let mut out = String::new();
    header(&mut out, Screen::Settings.title());
    writeln!(out, " Timezone:").unwrap();

    let zones = state.zones();
    let first = state
        .cursor
        .saturating_sub(ZONE_ROWS / 2)
        .min(zones.len().saturating_sub(ZONE_ROWS));
    for (i, zone) in zones.iter().enumerate().skip(first).take(ZONE_ROWS) {
        let marker = if i == state.cursor { "> " } else { "  " };
        writeln!(out, " {}{}", marker, zone).unwrap();
    }
    if let Some(status) = &state.status {
        writeln!(out, " {}", status).unwrap();
    }

    footer(&mut out, "j/k=move  J/K=page  w=save  b=back");
    out
}

pub fn draw_about() -> String {
    let mut out = String::new();
    header(&mut out, Screen::About.title());
    writeln!(out).unwrap();
    writeln!(out, " Clock {}", env!("CARGO_PKG_VERSION")).unwrap();
    writeln!(out, " {}", env!("CARGO_PKG_DESCRIPTION")).unwrap();
    writeln!(out).unwrap();
    writeln!(out, " Live clock in your chosen timezone,").unwrap();
    writeln!(out, " a stopwatch with laps, and settings.").unwrap();
    writeln!(out).unwrap();
    footer(&mut out, "b=back  m=menu");
    out
}

pub fn draw_menu(items: &[Screen], cursor: usize) -> String {
    let mut out = String::new();
    header(&mut out, "MENU");
    for (i, item) in items.iter().enumerate() {
        let marker = if i == cursor { "> " } else { "  " };
        writeln!(out, " {}{}", marker, item.title()).unwrap();
    }
    footer(&mut out, "j/k=select  ENTER=open  m=close");
    out
}

pub fn draw_help(help_text: &str) -> String {
    let mut out = String::new();
    rule(&mut out);
    for line in help_text.lines() {
        writeln!(out, " {}", line).unwrap();
    }
    footer(&mut out, "Press any key to close");
    out
}
