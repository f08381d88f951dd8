use super::record::OutputRecord;
use serde::Serialize;

/// Aggregate view of a finished series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub rows: usize,
    pub mean_oee: f64,
    pub mean_availability: f64,
    pub mean_performance: f64,
    pub mean_quality: f64,
    pub total_throughput: u64,
    pub final_finished_inventory: f64,
    pub downtime_hours: usize,
    pub maintenance_hours: usize,
}

impl SeriesSummary {
    pub fn from_records(records: &[OutputRecord]) -> Self {
        let rows = records.len();
        let mean = |f: fn(&OutputRecord) -> f64| {
            if rows == 0 {
                0.0
            } else {
                records.iter().map(f).sum::<f64>() / rows as f64
            }
        };
        Self {
            rows,
            mean_oee: mean(|r| r.oee),
            mean_availability: mean(|r| r.availability),
            mean_performance: mean(|r| r.performance),
            mean_quality: mean(|r| r.quality),
            total_throughput: records.iter().map(|r| r.throughput).sum(),
            final_finished_inventory: records.last().map_or(0.0, |r| r.finished_inventory),
            downtime_hours: records.iter().filter(|r| r.downtime_flag == 1).count(),
            maintenance_hours: records.iter().filter(|r| r.maintenance_flag == 1).count(),
        }
    }
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows, average OEE {:.3} (A {:.3} / P {:.3} / Q {:.3}), {} units produced, {} downtime hours",
            self.rows,
            self.mean_oee,
            self.mean_availability,
            self.mean_performance,
            self.mean_quality,
            self.total_throughput,
            self.downtime_hours
        )
    }
}
