use serde::{Deserialize, Serialize};

/// Шаг мастера создания плана ТО
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum WizardStep {
    #[default]
    Metadata,
    Scheduling,
    Equipment,
    Review,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Metadata,
            WizardStep::Scheduling,
            WizardStep::Equipment,
            WizardStep::Review,
        ]
    }

    /// Порядковый номер шага (0..=3)
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Metadata => 0,
            WizardStep::Scheduling => 1,
            WizardStep::Equipment => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Metadata => "Реквизиты",
            WizardStep::Scheduling => "Расписание",
            WizardStep::Equipment => "Оборудование",
            WizardStep::Review => "Проверка",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::all().get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::all()[i])
    }

    pub fn is_first(&self) -> bool {
        self.prev().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_sequence() {
        assert_eq!(WizardStep::Metadata.next(), Some(WizardStep::Scheduling));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Metadata.prev(), None);
        assert_eq!(WizardStep::Review.prev(), Some(WizardStep::Equipment));
        assert!(WizardStep::Review.is_last());
    }
}
