//! Планировщик ТО: продление повторяющихся планов по cron-расписанию

pub mod state;
pub mod worker;

pub use worker::{run_once, PmScheduler};
