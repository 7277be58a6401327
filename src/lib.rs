// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod model;

pub mod csv;
pub mod normalize;
pub mod schema;
pub mod sheet;
pub mod specs;

pub mod progress;
pub mod runner;
pub mod scrape;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
