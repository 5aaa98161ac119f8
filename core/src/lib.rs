#![no_std]

pub mod config;
pub mod control_units;
pub mod crc;
pub mod error;
pub mod raster;
pub mod record;

extern crate alloc;

#[cfg(test)]
extern crate std;

pub use config::Config;
pub use error::Error;
pub use raster::Raster;
