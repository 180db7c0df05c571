pub mod form;
pub mod schedule;
