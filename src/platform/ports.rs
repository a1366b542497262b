//! Port traits: the chassis shape platform code is written against.
//!
//! ```text
//!   Chassis ─┬─ all_psus()        ──▶ Psu ── all_fans() ──▶ Fan
//!            ├─ all_fans()        ──▶ Fan
//!            ├─ all_fan_drawers() ──▶ FanDrawer ── all_fans() ──▶ Fan
//!            └─ thermal_manager() ──▶ ThermalManagerRef (a type, not an instance)
//! ```
//!
//! Real platforms and the [`mock`](crate::mock) fixtures implement the
//! same traits, so policy code runs unchanged against either.

use core::any::TypeId;
use core::fmt;

use super::thermal::ThermalManager;

// ───────────────────────────────────────────────────────────────
// Components
// ───────────────────────────────────────────────────────────────

pub trait Fan {
    fn presence(&self) -> bool;

    /// `true` when the fan reports no fault.
    fn status(&self) -> bool;

    /// Commanded speed in percent of full.
    fn target_speed(&self) -> u8;

    fn set_speed(&mut self, speed: u8);

    fn name(&self) -> Option<&str>;
}

pub trait Psu {
    type Fan: Fan;

    fn presence(&self) -> bool;

    fn powergood_status(&self) -> bool;

    fn all_fans(&self) -> &[Self::Fan];

    fn all_fans_mut(&mut self) -> &mut [Self::Fan];
}

pub trait FanDrawer {
    type Fan: Fan;

    fn all_fans(&self) -> &[Self::Fan];

    fn all_fans_mut(&mut self) -> &mut [Self::Fan];
}

// ───────────────────────────────────────────────────────────────
// Chassis
// ───────────────────────────────────────────────────────────────

pub trait Chassis {
    type Fan: Fan;
    type Psu: Psu;
    type FanDrawer: FanDrawer;

    fn all_psus(&self) -> &[Self::Psu];
    fn all_fans(&self) -> &[Self::Fan];
    fn all_fan_drawers(&self) -> &[Self::FanDrawer];

    fn all_psus_mut(&mut self) -> &mut [Self::Psu];
    fn all_fans_mut(&mut self) -> &mut [Self::Fan];
    fn all_fan_drawers_mut(&mut self) -> &mut [Self::FanDrawer];

    /// The thermal manager type this chassis runs under.
    fn thermal_manager(&self) -> ThermalManagerRef;
}

/// Reference to a [`ThermalManager`] type.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ThermalManagerRef {
    type_id: TypeId,
    name: &'static str,
}

impl ThermalManagerRef {
    pub fn of<T: ThermalManager + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    /// Whether this reference names `T`.
    pub fn is<T: ThermalManager + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ThermalManagerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ThermalManagerRef").field(&self.name).finish()
    }
}
