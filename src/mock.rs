//! In-memory chassis fixtures for tests.
//!
//! Plain data holders behind the [`platform::ports`](crate::platform::ports)
//! traits. Fans built from the same [`SharedSpeed`] observe each other's
//! `set_speed`, which is how thermal tests check that a policy reached
//! "the fans" without tracking each one.

use std::cell::Cell;
use std::rc::Rc;

use crate::platform::ports::{Chassis, Fan, FanDrawer, Psu, ThermalManagerRef};
use crate::platform::thermal::AbsenceThermalManager;

/// Target speed every fan starts at.
pub const DEFAULT_FAN_SPEED: u8 = 60;

// ── SharedSpeed ───────────────────────────────────────────────

/// One speed value shared by every fan holding a clone.
///
/// `Rc<Cell<_>>`: fixtures are single-threaded.
#[derive(Debug, Clone)]
pub struct SharedSpeed(Rc<Cell<u8>>);

impl SharedSpeed {
    pub fn new(speed: u8) -> Self {
        Self(Rc::new(Cell::new(speed)))
    }

    pub fn get(&self) -> u8 {
        self.0.get()
    }

    pub fn set(&self, speed: u8) {
        self.0.set(speed);
    }
}

impl Default for SharedSpeed {
    fn default() -> Self {
        Self::new(DEFAULT_FAN_SPEED)
    }
}

// ── MockFan ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MockFan {
    pub presence: bool,
    pub status: bool,
    pub name: Option<String>,
    speed: SharedSpeed,
}

impl MockFan {
    pub fn new(speed: SharedSpeed) -> Self {
        Self {
            presence: true,
            status: true,
            name: None,
            speed,
        }
    }

    pub fn absent(speed: SharedSpeed) -> Self {
        Self {
            presence: false,
            ..Self::new(speed)
        }
    }
}

impl Fan for MockFan {
    fn presence(&self) -> bool {
        self.presence
    }

    fn status(&self) -> bool {
        self.status
    }

    fn target_speed(&self) -> u8 {
        self.speed.get()
    }

    fn set_speed(&mut self, speed: u8) {
        self.speed.set(speed);
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ── MockPsu ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MockPsu {
    pub presence: bool,
    pub powergood: bool,
    // Always empty; present for the trait shape.
    fans: Vec<MockFan>,
}

impl MockPsu {
    pub fn new() -> Self {
        Self {
            presence: true,
            powergood: true,
            fans: Vec::new(),
        }
    }
}

impl Default for MockPsu {
    fn default() -> Self {
        Self::new()
    }
}

impl Psu for MockPsu {
    type Fan = MockFan;

    fn presence(&self) -> bool {
        self.presence
    }

    fn powergood_status(&self) -> bool {
        self.powergood
    }

    fn all_fans(&self) -> &[MockFan] {
        &self.fans
    }

    fn all_fans_mut(&mut self) -> &mut [MockFan] {
        &mut self.fans
    }
}

// ── MockFanDrawer ─────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockFanDrawer {
    pub fan_list: Vec<MockFan>,
}

impl MockFanDrawer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FanDrawer for MockFanDrawer {
    type Fan = MockFan;

    fn all_fans(&self) -> &[MockFan] {
        &self.fan_list
    }

    fn all_fans_mut(&mut self) -> &mut [MockFan] {
        &mut self.fan_list
    }
}

// ── MockChassis ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MockChassis {
    pub fan_list: Vec<MockFan>,
    pub psu_list: Vec<MockPsu>,
    pub fan_drawer_list: Vec<MockFanDrawer>,
    speed: SharedSpeed,
}

impl MockChassis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chassis whose fans share `speed`.
    pub fn with_speed(speed: SharedSpeed) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    /// The speed handle fans of this chassis share.
    pub fn shared_speed(&self) -> &SharedSpeed {
        &self.speed
    }

    /// A present fan wired to this chassis's shared speed.
    pub fn new_fan(&self) -> MockFan {
        MockFan::new(self.speed.clone())
    }

    /// Append one drawer holding one absent fan.
    pub fn make_fan_absence(&mut self) {
        let mut drawer = MockFanDrawer::new();
        drawer.fan_list.push(MockFan::absent(self.speed.clone()));
        self.fan_drawer_list.push(drawer);
    }

    /// Append one absent PSU.
    pub fn make_psu_absence(&mut self) {
        let mut psu = MockPsu::new();
        psu.presence = false;
        self.psu_list.push(psu);
    }
}

impl Chassis for MockChassis {
    type Fan = MockFan;
    type Psu = MockPsu;
    type FanDrawer = MockFanDrawer;

    fn all_psus(&self) -> &[MockPsu] {
        &self.psu_list
    }

    fn all_fans(&self) -> &[MockFan] {
        &self.fan_list
    }

    fn all_fan_drawers(&self) -> &[MockFanDrawer] {
        &self.fan_drawer_list
    }

    fn all_psus_mut(&mut self) -> &mut [MockPsu] {
        &mut self.psu_list
    }

    fn all_fans_mut(&mut self) -> &mut [MockFan] {
        &mut self.fan_list
    }

    fn all_fan_drawers_mut(&mut self) -> &mut [MockFanDrawer] {
        &mut self.fan_drawer_list
    }

    fn thermal_manager(&self) -> ThermalManagerRef {
        ThermalManagerRef::of::<AbsenceThermalManager>()
    }
}
