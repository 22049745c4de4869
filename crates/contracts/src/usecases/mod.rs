pub mod common;
pub mod u100_pm_plan_wizard;
