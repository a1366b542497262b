//! Thermal policy.
//!
//! A missing or failed cooling component forces every remaining fan to
//! full speed; a healthy chassis is left at its current speed.
//!
//! Evaluation is read-only; [`apply_cooling`] writes the decision back
//! to the fans.

use log::{error, info};

use super::ports::{Chassis, Fan, FanDrawer, Psu};

/// Fan speed forced while any cooling fault is present.
pub const FULL_SPEED_PERCENT: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolingLevel {
    /// No fault: keep the current target speed.
    Normal,
    /// Fault present: run every fan at full speed.
    Full,
}

impl CoolingLevel {
    /// Speed to command, if any.
    pub fn target_speed(self) -> Option<u8> {
        match self {
            Self::Normal => None,
            Self::Full => Some(FULL_SPEED_PERCENT),
        }
    }
}

pub trait ThermalManager {
    const NAME: &'static str;

    fn evaluate<C: Chassis>(chassis: &C) -> CoolingLevel;
}

/// Full speed on any absent/failed fan or absent/unpowered PSU.
pub struct AbsenceThermalManager;

impl ThermalManager for AbsenceThermalManager {
    const NAME: &'static str = "absence";

    fn evaluate<C: Chassis>(chassis: &C) -> CoolingLevel {
        let mut faults = 0usize;

        for (i, fan) in chassis.all_fans().iter().enumerate() {
            faults += fan_fault("chassis", 0, i, fan);
        }
        for (d, drawer) in chassis.all_fan_drawers().iter().enumerate() {
            for (i, fan) in drawer.all_fans().iter().enumerate() {
                faults += fan_fault("drawer", d, i, fan);
            }
        }
        for (p, psu) in chassis.all_psus().iter().enumerate() {
            if !psu.presence() {
                error!("THERMAL | psu {} absent", p);
                faults += 1;
            } else if !psu.powergood_status() {
                error!("THERMAL | psu {} power not good", p);
                faults += 1;
            }
            for (i, fan) in psu.all_fans().iter().enumerate() {
                faults += fan_fault("psu", p, i, fan);
            }
        }

        if faults == 0 {
            CoolingLevel::Normal
        } else {
            CoolingLevel::Full
        }
    }
}

fn fan_fault(location: &str, owner: usize, index: usize, fan: &impl Fan) -> usize {
    let name = fan.name().unwrap_or("?");
    if !fan.presence() {
        error!("THERMAL | {}{} fan {} ({}) absent", location, owner, index, name);
        1
    } else if !fan.status() {
        error!("THERMAL | {}{} fan {} ({}) failed", location, owner, index, name);
        1
    } else {
        0
    }
}

/// Command every present fan to `level`. Returns the number of fans written.
pub fn apply_cooling<C: Chassis>(chassis: &mut C, level: CoolingLevel) -> usize {
    let Some(speed) = level.target_speed() else {
        return 0;
    };

    let mut written = set_present(chassis.all_fans_mut(), speed);
    for drawer in chassis.all_fan_drawers_mut() {
        written += set_present(drawer.all_fans_mut(), speed);
    }
    for psu in chassis.all_psus_mut() {
        written += set_present(psu.all_fans_mut(), speed);
    }

    info!("THERMAL | {} fans set to {}%", written, speed);
    written
}

fn set_present<F: Fan>(fans: &mut [F], speed: u8) -> usize {
    let mut written = 0;
    for fan in fans.iter_mut().filter(|f| f.presence()) {
        fan.set_speed(speed);
        written += 1;
    }
    written
}
