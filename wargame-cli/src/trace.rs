//! Game trace file and JSON-lines turn log

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use wargame_core::{GameState, MatchSummary, Player, SearchConfig, SearchStats, TurnRecord};

use crate::render;

/// `gameTrace-<alpha_beta>-<timeout>-<max_turns>.txt`
pub fn trace_file_name(config: &SearchConfig, max_turns: u32) -> String {
    let timeout = config.time_budget.map_or(0.0, |b| b.as_secs_f64());
    format!("gameTrace-{}-{}-{}.txt", config.alpha_beta, timeout, max_turns)
}

/// Human-readable record of one game
pub struct TraceWriter {
    out: BufWriter<File>,
    path: PathBuf,
}

impl TraceWriter {
    pub fn create(dir: &Path, mode: &str, config: &SearchConfig, initial: &GameState) -> Result<Self> {
        let path = dir.join(trace_file_name(config, initial.rules().max_turns));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
        let mut out = BufWriter::new(file);

        writeln!(out, "Game started {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "Rules: {}", initial.rules().name)?;
        writeln!(out, "Mode: {}", mode)?;
        writeln!(out, "Timeout: {:?}", config.time_budget)?;
        writeln!(out, "Max turns: {}", initial.rules().max_turns)?;
        writeln!(out, "Max depth: {}", config.max_depth)?;
        writeln!(out, "Alpha-beta: {}", config.alpha_beta)?;
        writeln!(out, "Heuristic: {}", config.heuristic)?;
        writeln!(out)?;
        writeln!(out, "{}", render::render_board(initial))?;

        Ok(Self { out, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_turn(&mut self, record: &TurnRecord, after: &GameState) -> Result<()> {
        writeln!(self.out, "{}", render::describe_turn(record))?;
        if let Some(report) = &record.search {
            write!(self.out, "{}", render::render_report(report))?;
        }
        writeln!(self.out, "{}", render::turn_header(after))?;
        writeln!(self.out, "{}", render::render_units(after.rules().dim, &record.units))?;
        Ok(())
    }

    /// Closing section: winner and each AI's cumulative statistics
    pub fn finish(mut self, summary: &MatchSummary, stats: &[(Player, &SearchStats)]) -> Result<()> {
        match summary.winner() {
            Some(player) => writeln!(self.out, "{} wins in {} turns", player, summary.turns_played)?,
            None => writeln!(self.out, "Draw after {} turns", summary.turns_played)?,
        }
        for (player, stats) in stats {
            writeln!(self.out, "\n{} AI", player)?;
            write!(self.out, "{}", render::render_stats(stats))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per turn
pub struct JsonLog {
    out: BufWriter<File>,
}

impl JsonLog {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON log: {}", path.display()))?;
        Ok(Self { out: BufWriter::new(file) })
    }

    pub fn record_turn(&mut self, record: &TurnRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trace_file_name() {
        let config = SearchConfig::default();
        assert_eq!(trace_file_name(&config, 100), "gameTrace-true-5-100.txt");

        let config = SearchConfig::default()
            .with_alpha_beta(false)
            .with_time_budget(Some(Duration::from_millis(2500)));
        assert_eq!(trace_file_name(&config, 40), "gameTrace-false-2.5-40.txt");
    }
}
