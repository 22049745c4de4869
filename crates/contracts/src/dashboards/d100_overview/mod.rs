pub mod dto;

pub use dto::{CountByKey, OverviewResponse, RecentIncident, DUE_SOON_DAYS, RECENT_INCIDENTS_LIMIT};
