//! Text panel for the consciousness simulation

use super::{Consciousness, WaveBand};
use std::fmt::Write as _;
use std::io::{self, Write};

const INNER_WIDTH: usize = 58;
const INTENSITY_CELLS: usize = 30;
const BAR_CELLS: usize = 20;

/// Glyph for a wave value mapped from -1..1 onto 0..1
pub fn wave_glyph(normalized: f64) -> char {
    if normalized < 0.3 {
        '▁'
    } else if normalized < 0.5 {
        '▃'
    } else if normalized < 0.7 {
        '▅'
    } else {
        '▇'
    }
}

pub fn wave_bar(value: f64) -> String {
    let normalized = (value + 1.0) / 2.0;
    let filled = cells(normalized, BAR_CELLS);
    let glyph = wave_glyph(normalized);
    let mut bar = String::with_capacity(BAR_CELLS + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(glyph).take(filled));
    bar.extend(std::iter::repeat('─').take(BAR_CELLS - filled));
    bar.push(']');
    bar
}

/// `fill` repeated for `level` of `width` cells, padded with `empty`
pub fn level_bar(level: f64, width: usize, fill: char, empty: char) -> String {
    let filled = cells(level, width);
    std::iter::repeat(fill)
        .take(filled)
        .chain(std::iter::repeat(empty).take(width - filled))
        .collect()
}

fn cells(level: f64, width: usize) -> usize {
    ((level.clamp(0.0, 1.0) * width as f64) as usize).min(width)
}

fn boxed(line: &str) -> String {
    format!("║{:<width$}║\n", line, width = INNER_WIDTH)
}

/// Render the monitor panel followed by the recent transition trail
pub fn render(consciousness: &Consciousness) -> String {
    let state = consciousness.current_state();
    let rhythm = consciousness.bio_rhythm();
    let rule = "═".repeat(INNER_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "╔{rule}╗");
    let _ = writeln!(
        out,
        "║{:^width$}║",
        "LUKHΛS CONSCIOUSNESS STATE MONITOR",
        width = INNER_WIDTH
    );
    let _ = writeln!(out, "╠{rule}╣");

    out.push_str(&boxed(&format!(" Current State: {state}")));
    out.push_str(&boxed(&format!(
        " Intensity: [{}] {:.2}",
        level_bar(state.intensity(), INTENSITY_CELLS, '█', '░'),
        state.intensity()
    )));

    out.push_str(&boxed(""));
    out.push_str(&boxed(" Bio-Rhythmic Patterns:"));
    for band in WaveBand::ALL {
        out.push_str(&boxed(&format!(
            "   {:<14}{} {}",
            format!("{}:", band.label()),
            wave_bar(rhythm.band(band)),
            band.role()
        )));
    }

    out.push_str(&boxed(""));
    out.push_str(&boxed(" System Metrics:"));
    for (label, value) in [
        ("Attention:", consciousness.attention_focus()),
        ("Energy:", consciousness.energy_level()),
        ("Memory Fold:", consciousness.memory_consolidation()),
    ] {
        out.push_str(&boxed(&format!(
            "   {:<14}[{}] {:.2}",
            label,
            level_bar(value, BAR_CELLS, '▰', '▱'),
            value
        )));
    }
    let _ = writeln!(out, "╚{rule}╝");

    let history = consciousness.history();
    if !history.is_empty() {
        let start = history.len().saturating_sub(consciousness.history_window());
        out.push_str("\nRecent State Transitions:\n ");
        for past in &history[start..] {
            let _ = write!(out, " {past} →");
        }
        let _ = writeln!(out, " {state}");
    }

    out
}

/// Clear the terminal before redrawing the panel
#[cfg(feature = "cli")]
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
    execute!(out, MoveTo(0, 0), Clear(ClearType::All))
}

#[cfg(not(feature = "cli"))]
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(b"\x1b[H\x1b[J")?;
    out.flush()
}
