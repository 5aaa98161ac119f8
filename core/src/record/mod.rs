//! The fixed-layout binary records exchanged with the device.

pub mod background;
pub mod settings;
pub mod sprites;
