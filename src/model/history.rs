use chrono::Utc;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use terrarium_data::{LiveEvent, Species, TickStats};

pub const DEFAULT_HISTORY_LEN: usize = 30;

/// Bounded ring buffer of the most recent tick statistics.
#[derive(Debug, Clone)]
pub struct StatsHistory {
    entries: VecDeque<TickStats>,
    max_len: usize,
}

impl Default for StatsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl StatsHistory {
    /// A zero `max_len` is raised to one.
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            entries: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn push(&mut self, stats: TickStats) {
        if self.entries.len() == self.max_len {
            self.entries.pop_front();
        }
        self.entries.push_back(stats);
    }

    pub fn latest(&self) -> Option<&TickStats> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TickStats> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Population change of `species` across the buffered window.
    pub fn trend(&self, species: Species) -> i64 {
        match (self.entries.front(), self.entries.back()) {
            (Some(first), Some(last)) => last.count(species) as i64 - first.count(species) as i64,
            _ => 0,
        }
    }
}

#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    timestamp: String,
    #[serde(flatten)]
    record: &'a T,
}

/// Appends tick statistics and live events to a JSON-lines file.
///
/// Every line carries an RFC 3339 wall-clock timestamp next to the
/// simulated time already present in the record.
pub struct HistoryLogger {
    file: Option<BufWriter<File>>,
}

impl HistoryLogger {
    pub fn new_at(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
        })
    }

    /// A logger that discards everything.
    pub fn new_dummy() -> Self {
        Self { file: None }
    }

    pub fn is_active(&self) -> bool {
        self.file.is_some()
    }

    pub fn log_stats(&mut self, stats: &TickStats) -> anyhow::Result<()> {
        self.write_line(stats)
    }

    pub fn log_event(&mut self, event: &LiveEvent) -> anyhow::Result<()> {
        self.write_line(event)
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, record: &T) -> anyhow::Result<()> {
        if let Some(file) = self.file.as_mut() {
            let line = serde_json::to_string(&Stamped {
                timestamp: Utc::now().to_rfc3339(),
                record,
            })?;
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(tick: u64, plants: usize) -> TickStats {
        TickStats {
            tick,
            plant_count: plants,
            total: plants,
            ..Default::default()
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = StatsHistory::new(3);
        for tick in 1..=5 {
            history.push(stats(tick, tick as usize));
        }
        assert_eq!(history.len(), 3);
        let ticks: Vec<u64> = history.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![3, 4, 5]);
        assert_eq!(history.latest().map(|s| s.tick), Some(5));
        assert_eq!(history.trend(Species::Plant), 2);
    }

    #[test]
    fn test_default_length() {
        let history = StatsHistory::default();
        assert_eq!(history.max_len(), 30);
        assert!(history.is_empty());
        assert_eq!(StatsHistory::new(0).max_len(), 1);
    }

    #[test]
    fn test_logger_writes_stamped_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("live.jsonl");
        let mut logger = HistoryLogger::new_at(&path).expect("open");
        logger.log_stats(&stats(7, 2)).expect("stats");
        logger
            .log_event(&LiveEvent::DroughtEnded { sim_time: 1.0 })
            .expect("event");
        logger.flush().expect("flush");

        let content = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).expect("json"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["tick"], 7);
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["event"], "DroughtEnded");
    }

    #[test]
    fn test_dummy_logger_is_silent() {
        let mut logger = HistoryLogger::new_dummy();
        assert!(!logger.is_active());
        assert!(logger.log_stats(&stats(1, 1)).is_ok());
    }
}
