pub mod action;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod lock;
pub mod paths;
pub mod population;
pub mod reminder;
pub mod schedule;
pub mod submission;

pub use error::{Result, RoundupError};
