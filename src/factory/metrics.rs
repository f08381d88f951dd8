use super::machine::MachineState;

/// Quality yield for a machine running at health `h`
pub fn quality_grade(h: f64) -> f64 {
    if h > 0.85 {
        0.99
    } else if h > 0.6 {
        0.92
    } else {
        0.85
    }
}

/// Availability, performance and quality of the line for one hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OeeComponents {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl OeeComponents {
    pub fn from_machines(machines: &[MachineState]) -> Self {
        if machines.is_empty() {
            return Self {
                availability: 0.0,
                performance: 0.0,
                quality: 0.0,
                oee: 0.0,
            };
        }
        let count = machines.len() as f64;
        let working = machines.iter().filter(|m| m.is_working()).count() as f64;
        let effs: Vec<f64> = machines.iter().map(MachineState::effective_health).collect();

        let availability = working / count;
        let performance = effs.iter().sum::<f64>() / count;
        let quality = effs.iter().map(|&h| quality_grade(h)).sum::<f64>() / count;
        Self {
            availability,
            performance,
            quality,
            oee: availability * performance * quality,
        }
    }
}

/// Mean of the per-machine MTBF values
pub fn mean_mtbf(machines: &[MachineState]) -> f64 {
    if machines.is_empty() {
        return 0.0;
    }
    machines.iter().map(MachineState::mtbf).sum::<f64>() / machines.len() as f64
}
