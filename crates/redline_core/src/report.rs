//! Human-readable status lines
//!
//! Every line stands on its own; hosts may stack them in a log view or
//! export the whole log at once.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Emitted once, when the baseline window fills.
    Baseline { baseline_ms: f64 },
    /// Emitted on every tick that grows the workload.
    Progress {
        vertex_count: u32,
        baseline_ms: f64,
        average_ms: f64,
    },
    /// Emitted once, on the tick the budget is first exceeded.
    Final {
        vertex_count: u32,
        baseline_ms: f64,
        average_ms: f64,
    },
}

impl Report {
    pub fn fps(&self) -> Option<f64> {
        match self {
            Report::Baseline { .. } => None,
            Report::Progress { average_ms, .. } | Report::Final { average_ms, .. } => {
                Some(fps(*average_ms))
            }
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Report::Final { .. })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Baseline { baseline_ms } => write!(f, "Baseline: {baseline_ms:.2}ms"),
            Report::Progress {
                vertex_count,
                baseline_ms,
                average_ms,
            } => write!(
                f,
                "Vertices: {} | Baseline: {:.2}ms | Avg: {:.2}ms | FPS: {:.1}",
                group_thousands(u64::from(*vertex_count)),
                baseline_ms,
                average_ms,
                fps(*average_ms)
            ),
            Report::Final {
                vertex_count,
                baseline_ms,
                average_ms,
            } => write!(
                f,
                "Breaking point: {} vertices | Baseline: {:.2}ms | Avg: {:.2}ms | FPS: {:.1}",
                group_thousands(u64::from(*vertex_count)),
                baseline_ms,
                average_ms,
                fps(*average_ms)
            ),
        }
    }
}

fn fps(frame_time_ms: f64) -> f64 {
    if frame_time_ms > 0.0 {
        1000.0 / frame_time_ms
    } else {
        0.0
    }
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Append-only record of every emitted report.
#[derive(Debug, Clone, Default)]
pub struct ReportLog {
    entries: Vec<Report>,
}

impl ReportLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, report: Report) -> &Report {
        self.entries.push(report);
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Report> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Report> {
        self.entries.iter()
    }

    /// All lines, newline-joined.
    pub fn export(&self) -> String {
        self.entries
            .iter()
            .map(Report::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_line() {
        let report = Report::Baseline { baseline_ms: 5.0 };
        assert_eq!(report.to_string(), "Baseline: 5.00ms");
        assert_eq!(report.fps(), None);
    }

    #[test]
    fn progress_line() {
        let report = Report::Progress {
            vertex_count: 12_000,
            baseline_ms: 4.996,
            average_ms: 10.0,
        };
        assert_eq!(
            report.to_string(),
            "Vertices: 12,000 | Baseline: 5.00ms | Avg: 10.00ms | FPS: 100.0"
        );
    }

    #[test]
    fn final_line() {
        let report = Report::Final {
            vertex_count: 1_250_000,
            baseline_ms: 5.0,
            average_ms: 16.7,
        };
        assert!(report.is_final());
        assert_eq!(
            report.to_string(),
            "Breaking point: 1,250,000 vertices | Baseline: 5.00ms | Avg: 16.70ms | FPS: 59.9"
        );
    }

    #[test]
    fn groups_digits() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123_456_789), "123,456,789");
    }

    #[test]
    fn export_joins_lines_in_order() {
        let mut log = ReportLog::new();
        assert_eq!(log.export(), "");

        log.append(Report::Baseline { baseline_ms: 5.0 });
        log.append(Report::Progress {
            vertex_count: 2000,
            baseline_ms: 5.0,
            average_ms: 8.0,
        });

        assert_eq!(
            log.export(),
            "Baseline: 5.00ms\nVertices: 2,000 | Baseline: 5.00ms | Avg: 8.00ms | FPS: 125.0"
        );
        assert_eq!(log.len(), 2);
    }
}
