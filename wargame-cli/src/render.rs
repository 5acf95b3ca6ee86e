//! Text rendering of boards and search reports

use std::fmt::Write;

use wargame_core::{Coord, GameState, SearchReport, SearchStats, TurnRecord, Unit};

const ROW_LABELS: &[u8] = b"ABCDEFGHIJKLMNOP";

/// Grid with row letters and column numbers; units as e.g. `dF9`
pub fn render_units(dim: u8, units: &[(Coord, Unit)]) -> String {
    let mut out = String::from("    ");
    for col in 0..dim {
        let _ = write!(out, "{:^5}", col);
    }
    out.push('\n');

    for row in 0..dim {
        let label = ROW_LABELS.get(row as usize).map_or('?', |&b| b as char);
        let _ = write!(out, " {}: ", label);
        for col in 0..dim {
            let at = Coord::new(row as i8, col as i8);
            match units.iter().find(|(c, _)| *c == at) {
                Some((_, unit)) => {
                    let _ = write!(out, " {} ", unit);
                }
                None => out.push_str("  .  "),
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_board(state: &GameState) -> String {
    let units: Vec<_> = state.board().units().map(|(at, u)| (at, *u)).collect();
    render_units(state.rules().dim, &units)
}

/// Header line shown above each board
pub fn turn_header(state: &GameState) -> String {
    format!(
        "Turn #{}/{}  {} to move",
        state.turns_played,
        state.rules().max_turns,
        state.current_player()
    )
}

pub fn describe_turn(record: &TurnRecord) -> String {
    format!("{}: {} {}", record.turn, record.player, record.mv)
}

/// Per-move search readout
pub fn render_report(report: &SearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Heuristic score: {}", report.score);
    let _ = writeln!(
        out,
        "Depth reached: {}{}{}",
        report.depth_reached,
        if report.timed_out { " (time budget hit)" } else { "" },
        if report.fallback { " (fallback move)" } else { "" }
    );
    let _ = writeln!(out, "Evals per depth: {}", render_counts(&report.evaluations_per_depth));
    let _ = writeln!(out, "Average branching factor: {:.1}", report.average_branching);
    let _ = writeln!(out, "Elapsed time: {:.2}s", report.elapsed.as_secs_f64());
    out
}

/// Cumulative readout across a whole game
pub fn render_stats(stats: &SearchStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cumulative evals: {}", stats.total_evaluations());
    let _ = writeln!(out, "Cumulative evals per depth: {}", render_counts(&stats.per_depth()));
    let _ = writeln!(out, "Eval perf.: {:.1}k/s", stats.evals_per_second() / 1000.0);
    let _ = writeln!(out, "Average depth: {:.1}", stats.average_depth());
    out
}

fn render_counts(counts: &[(u32, u64)]) -> String {
    counts
        .iter()
        .map(|(ply, count)| format!("{}:{}", ply, count))
        .collect::<Vec<_>>()
        .join(" ")
}
