//! Chassis capability traits and the thermal policy that consumes them.

pub mod ports;
pub mod thermal;
