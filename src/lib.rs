#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod config;
pub mod link;
pub mod pipeline;
pub mod sync;
pub mod telemetry;
pub mod types;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
