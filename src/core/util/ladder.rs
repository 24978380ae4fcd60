use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::util::query_duration::{DurationParseError, QueryDuration};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    #[error("ladder must contain at least one value")]
    Empty,

    #[error("invalid ladder rung: {0}")]
    Rung(#[from] DurationParseError),
}

/// Ordered set of allowed durations that quantized values snap to.
///
/// Always non-empty, sorted ascending and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ladder {
    rungs: Vec<QueryDuration>,
}

impl Ladder {
    pub fn new<I>(rungs: I) -> Result<Self, LadderError>
    where
        I: IntoIterator<Item = QueryDuration>,
    {
        let mut rungs: Vec<QueryDuration> = rungs.into_iter().collect();
        if rungs.is_empty() {
            return Err(LadderError::Empty);
        }
        rungs.sort_unstable();
        rungs.dedup();
        Ok(Self { rungs })
    }

    /// `30s, 1m, 2m, 5m, 10m, 15m, 30m, 1h, 2h, 3h, 6h`
    pub fn default_step() -> Self {
        Self {
            rungs: vec![
                QueryDuration::from_secs(30),
                QueryDuration::from_mins(1),
                QueryDuration::from_mins(2),
                QueryDuration::from_mins(5),
                QueryDuration::from_mins(10),
                QueryDuration::from_mins(15),
                QueryDuration::from_mins(30),
                QueryDuration::from_hours(1),
                QueryDuration::from_hours(2),
                QueryDuration::from_hours(3),
                QueryDuration::from_hours(6),
            ],
        }
    }

    /// `1m, 5m, 15m, 30m, 1h, 2h, 6h, 12h`
    pub fn default_rate() -> Self {
        Self {
            rungs: vec![
                QueryDuration::from_mins(1),
                QueryDuration::from_mins(5),
                QueryDuration::from_mins(15),
                QueryDuration::from_mins(30),
                QueryDuration::from_hours(1),
                QueryDuration::from_hours(2),
                QueryDuration::from_hours(6),
                QueryDuration::from_hours(12),
            ],
        }
    }

    /// Smallest rung `>= ms`, or the largest rung when none qualifies.
    pub fn snap_up(&self, ms: u64) -> QueryDuration {
        let idx = self.rungs.partition_point(|rung| rung.as_millis() < ms);
        self.rungs.get(idx).copied().unwrap_or_else(|| self.max())
    }

    pub fn min(&self) -> QueryDuration {
        self.rungs[0]
    }

    pub fn max(&self) -> QueryDuration {
        self.rungs[self.rungs.len() - 1]
    }

    pub fn contains(&self, value: QueryDuration) -> bool {
        self.rungs.binary_search(&value).is_ok()
    }

    pub fn rungs(&self) -> &[QueryDuration] {
        &self.rungs
    }
}

impl FromStr for Ladder {
    type Err = LadderError;

    /// Comma separated duration tokens, e.g. `"30s,1m,5m"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rungs = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(QueryDuration::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rungs)
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rung) in self.rungs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{rung}")?;
        }
        Ok(())
    }
}
