#![no_std]

#[cfg(test)]
extern crate std;

mod error;
mod log;

pub mod config;
pub mod device;
pub mod interface;
pub mod registers;
pub mod timing;

pub use crate::device::{Afe4400, DeviceState};
pub use crate::error::{Error, Result};
