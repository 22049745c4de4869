use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Перечисление статусов с допустимыми переходами.
///
/// Статусы сериализуются в snake_case и хранятся в БД строкой `as_str()`.
pub trait StatusWorkflow:
    Copy + PartialEq + Eq + Serialize + DeserializeOwned + std::fmt::Debug + 'static
{
    /// Все значения в порядке отображения
    fn all() -> &'static [Self];

    /// Строковое значение для БД и API
    fn as_str(&self) -> &'static str;

    /// Подпись для UI
    fn label(&self) -> &'static str;

    /// Разрешён ли переход `self -> next`
    fn can_transition_to(&self, next: Self) -> bool;

    /// Разбор строкового значения
    fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == s)
    }

    /// Допустимые следующие статусы
    fn next_statuses(&self) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }

    /// Проверить переход и вернуть сообщение об ошибке для UI
    fn check_transition(&self, next: Self) -> Result<(), String> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(format!(
                "Недопустимый переход статуса: «{}» → «{}»",
                self.label(),
                next.label()
            ))
        }
    }
}

/// Тело запроса `POST /api/<aggregate>/:id/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

impl StatusChangeRequest {
    pub fn new<S: StatusWorkflow>(status: S) -> Self {
        Self {
            status: status.as_str().to_string(),
        }
    }

    /// Разобрать статус запроса в конкретное перечисление
    pub fn parse<S: StatusWorkflow>(&self) -> Result<S, String> {
        S::parse(self.status.trim()).ok_or_else(|| format!("Неизвестный статус: {}", self.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a005_work_order::WorkOrderStatus;

    #[test]
    fn test_status_change_request_parse() {
        let req = StatusChangeRequest::new(WorkOrderStatus::InProgress);
        assert_eq!(req.status, "in_progress");
        assert_eq!(req.parse::<WorkOrderStatus>(), Ok(WorkOrderStatus::InProgress));

        let bad = StatusChangeRequest {
            status: "done".into(),
        };
        assert!(bad.parse::<WorkOrderStatus>().is_err());
    }

    #[test]
    fn test_check_transition_message() {
        let err = WorkOrderStatus::Closed
            .check_transition(WorkOrderStatus::New)
            .unwrap_err();
        assert!(err.starts_with("Недопустимый переход статуса"));
    }
}
