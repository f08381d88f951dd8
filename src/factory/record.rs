use serde::{Deserialize, Serialize};

/// One hour of plant telemetry; the column names are the CSV contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub hour: u64,
    #[serde(rename = "OEE")]
    pub oee: f64,
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub throughput: u64,
    #[serde(rename = "rawInventory")]
    pub raw_inventory: f64,
    pub wip: f64,
    #[serde(rename = "finishedInventory")]
    pub finished_inventory: f64,
    #[serde(rename = "energyPrice")]
    pub energy_price: f64,
    pub temp: f64,
    pub humidity: f64,
    pub voltage: f64,
    #[serde(rename = "availableWorkers")]
    pub available_workers: u32,
    pub fatigue: f64,
    #[serde(rename = "maintenanceFlag")]
    pub maintenance_flag: u8,
    #[serde(rename = "downtimeFlag")]
    pub downtime_flag: u8,
    #[serde(rename = "MTBF")]
    pub mtbf: f64,
    pub shift: u8,
}

/// Column order of the CSV output
pub const COLUMNS: [&str; 19] = [
    "hour",
    "OEE",
    "availability",
    "performance",
    "quality",
    "throughput",
    "rawInventory",
    "wip",
    "finishedInventory",
    "energyPrice",
    "temp",
    "humidity",
    "voltage",
    "availableWorkers",
    "fatigue",
    "maintenanceFlag",
    "downtimeFlag",
    "MTBF",
    "shift",
];

impl OutputRecord {
    /// Floating-point columns by name, for range checks
    pub fn float_columns(&self) -> [(&'static str, f64); 13] {
        [
            ("OEE", self.oee),
            ("availability", self.availability),
            ("performance", self.performance),
            ("quality", self.quality),
            ("rawInventory", self.raw_inventory),
            ("wip", self.wip),
            ("finishedInventory", self.finished_inventory),
            ("energyPrice", self.energy_price),
            ("temp", self.temp),
            ("humidity", self.humidity),
            ("voltage", self.voltage),
            ("fatigue", self.fatigue),
            ("MTBF", self.mtbf),
        ]
    }
}
