pub mod a001_factory;
pub mod a002_equipment;
pub mod a003_checklist_template;
pub mod a004_pm_plan;
pub mod a005_work_order;
pub mod a006_corrective_maintenance;
