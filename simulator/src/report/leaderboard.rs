use anyhow::Context;
use shotcore::prelude::{CoreError, CoreResult};
use shotcore::scoring::{LeaderboardBackend, LeaderboardEntry};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Leaderboard kept as one JSON entry per line in a local file.
pub struct JsonLinesLeaderboard {
    path: PathBuf,
}

impl JsonLinesLeaderboard {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> anyhow::Result<Vec<LeaderboardEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading leaderboard {}", self.path.display()))?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(index, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!("parsing leaderboard {} entry {}", self.path.display(), index + 1)
                })
            })
            .collect()
    }

    /// Best entries by hit factor, highest first.
    pub fn top(&self, drill: &str, limit: usize) -> anyhow::Result<Vec<LeaderboardEntry>> {
        let mut entries: Vec<LeaderboardEntry> = self
            .entries()?
            .into_iter()
            .filter(|entry| entry.drill == drill)
            .collect();
        entries.sort_by(|a, b| b.result.hit_factor.total_cmp(&a.result.hit_factor));
        entries.truncate(limit);
        Ok(entries)
    }
}

impl LeaderboardBackend for JsonLinesLeaderboard {
    fn submit(&self, entry: &LeaderboardEntry) -> CoreResult<()> {
        let line = serde_json::to_string(entry).map_err(|err| CoreError::Backend(err.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| CoreError::Backend(err.to_string()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| CoreError::Backend(err.to_string()))?;
        writeln!(file, "{}", line).map_err(|err| CoreError::Backend(err.to_string()))
    }
}
