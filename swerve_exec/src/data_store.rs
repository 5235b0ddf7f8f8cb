//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::chassis;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulation elapsed time, which is also script time
    pub sim_time_s: f64,

    // Chassis
    pub chassis_output: chassis::OutputData,
    pub chassis_status_rpt: chassis::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of commands rejected by the chassis
    pub num_rejected_cmds: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz.round() as u64).max(1) == 0;
    }

    /// Perform actions required at the end of a cycle, advancing simulation
    /// time by one cycle.
    pub fn cycle_end(&mut self, cycle_period_s: f64) {
        self.num_cycles += 1;
        self.sim_time_s = self.num_cycles as f64 * cycle_period_s;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cycle_management() {
        let mut ds = DataStore::default();
        let mut num_1_hz = 0;

        for _ in 0..150 {
            ds.cycle_start(50.0);
            if ds.is_1_hz_cycle {
                num_1_hz += 1;
            }
            ds.cycle_end(0.02);
        }

        assert_eq!(num_1_hz, 3);
        assert_eq!(ds.num_cycles, 150);
        assert!((ds.sim_time_s - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cycle_start_keeps_last_output() {
        let mut ds = DataStore::default();
        ds.chassis_status_rpt.speeds_saturated = true;
        ds.chassis_output.wheels[0].drive_speed = 0.5;
        ds.cycle_end(0.02);

        ds.cycle_start(50.0);
        assert!(!ds.is_1_hz_cycle);
        assert!(ds.chassis_status_rpt.speeds_saturated);
        assert_eq!(ds.chassis_output.wheels[0].drive_speed, 0.5);
    }
}
