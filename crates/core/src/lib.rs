#![forbid(unsafe_code)]

pub mod model;
pub mod steps;
pub mod time;
pub mod titration;

pub use time::Clock;
