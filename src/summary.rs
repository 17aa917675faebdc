use chrono::prelude::*;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;

/// Running tallies for one play session, kept in memory only. The game
/// records hits, misses and completed rounds as they happen; the game-over
/// screen reads `top_missed` to show which letters need practice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    pub hits: u32,
    pub misses: u32,
    pub rounds_completed: u32,
    pub best_streak: u32,
    pub missed_chars: HashMap<char, u32>,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self, expected: char) {
        self.misses += 1;
        *self.missed_chars.entry(expected).or_insert(0) += 1;
    }

    pub fn record_round(&mut self) {
        self.rounds_completed += 1;
    }

    pub fn note_streak(&mut self, streak: u32) {
        self.best_streak = self.best_streak.max(streak);
    }

    /// Most-missed characters, highest count first; ties break alphabetically
    /// so the game-over list is stable.
    pub fn top_missed(&self, n: usize) -> Vec<(char, u32)> {
        self.missed_chars
            .iter()
            .map(|(c, count)| (*c, *count))
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
            .take(n)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hits == 0 && self.misses == 0
    }
}

/// One line in the append-only results log.
#[derive(Debug, Serialize)]
pub struct SessionRecord {
    pub date: String,
    pub level: String,
    pub score: u32,
    pub best_streak: u32,
    pub rounds: u32,
    pub hits: u32,
    pub misses: u32,
}

impl SessionRecord {
    pub fn new(level: &str, score: u32, summary: &SessionSummary) -> Self {
        Self {
            date: Local::now().format("%c").to_string(),
            level: level.to_string(),
            score,
            best_streak: summary.best_streak,
            rounds: summary.rounds_completed,
            hits: summary.hits,
            misses: summary.misses,
        }
    }
}

/// Appends one record to the sessions log, emitting the header when the file
/// is new. The log is write-only as far as the game is concerned.
pub fn append_record(path: &Path, record: &SessionRecord) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // If the log doesn't exist yet, we need to emit a header
    let needs_header = !path.exists();

    let log_file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(log_file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_summary_starts_empty() {
        let summary = SessionSummary::new();

        assert!(summary.is_empty());
        assert_eq!(summary.best_streak, 0);
        assert_eq!(summary.top_missed(5), vec![]);
    }

    #[test]
    fn test_record_hit_and_miss() {
        let mut summary = SessionSummary::new();

        summary.record_hit();
        summary.record_hit();
        summary.record_miss('K');

        assert_eq!(summary.hits, 2);
        assert_eq!(summary.misses, 1);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_note_streak_keeps_best() {
        let mut summary = SessionSummary::new();

        summary.note_streak(3);
        summary.note_streak(7);
        summary.note_streak(2);

        assert_eq!(summary.best_streak, 7);
    }

    #[test]
    fn test_top_missed_ordering() {
        let mut summary = SessionSummary::new();

        summary.record_miss('B');
        summary.record_miss('K');
        summary.record_miss('K');
        summary.record_miss('K');
        summary.record_miss('A');
        summary.record_miss('A');

        assert_eq!(summary.top_missed(2), vec![('K', 3), ('A', 2)]);
    }

    #[test]
    fn test_top_missed_ties_break_alphabetically() {
        let mut summary = SessionSummary::new();

        summary.record_miss('Z');
        summary.record_miss('A');
        summary.record_miss('M');

        assert_eq!(summary.top_missed(3), vec![('A', 1), ('M', 1), ('Z', 1)]);
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.csv");

        let mut summary = SessionSummary::new();
        summary.record_hit();
        summary.note_streak(1);
        summary.record_round();

        let record = SessionRecord::new("1", 100, &summary);
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,level,score,best_streak,rounds,hits,misses"));
        assert!(lines[1].contains(",1,100,1,1,1,0"));
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn test_append_record_creates_missing_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("deep").join("sessions.csv");

        let summary = SessionSummary::new();
        let record = SessionRecord::new("2", 0, &summary);

        append_record(&path, &record).unwrap();

        assert!(path.exists());
    }
}
