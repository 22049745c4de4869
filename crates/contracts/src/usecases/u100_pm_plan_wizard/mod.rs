pub mod draft;
pub mod step;

pub use draft::{DraftSummary, PmPlanDraft, WizardEquipmentRow};
pub use step::WizardStep;

use crate::usecases::common::UseCaseMetadata;

pub struct PmPlanWizard;

impl UseCaseMetadata for PmPlanWizard {
    fn usecase_index() -> &'static str {
        "u100"
    }

    fn usecase_name() -> &'static str {
        "pm_plan_wizard"
    }

    fn display_name() -> &'static str {
        "Мастер создания плана ТО"
    }

    fn description() -> &'static str {
        "Пошаговое создание плана ТО: реквизиты, расписание, оборудование, проверка"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(PmPlanWizard::full_name(), "u100_pm_plan_wizard");
    }
}
