pub mod config;
pub mod dispatch;
pub mod gate;
pub mod init;
pub mod remind;
pub mod schedule;
pub mod serve;
