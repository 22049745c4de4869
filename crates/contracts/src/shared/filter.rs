//! Фильтры списков в виде «чипов» и текстовый поиск

use serde::{Deserialize, Serialize};

/// Минимальная длина поискового запроса, с которой он начинает работать
pub const MIN_SEARCH_LEN: usize = 2;

/// Трейт для строк списка, поддерживающих фильтрацию
pub trait Filterable {
    /// Значение поля для сравнения с чипом фильтра (например, статус)
    fn filter_value(&self, field: &str) -> Option<String>;

    /// Тексты, по которым идёт поиск (код, наименование и т.п.)
    fn search_text(&self) -> Vec<String>;
}

/// Активный фильтр («чип»)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChip {
    pub field: String,
    pub value: String,
    pub label: String,
}

/// Набор активных фильтров. На одно поле — не более одного чипа.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    chips: Vec<FilterChip>,
    search: String,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Переключить чип: тот же `field=value` снимается, иначе ставится
    /// (заменяя прежнее значение этого поля)
    pub fn toggle(&mut self, field: &str, value: &str, label: &str) {
        if self.value_of(field) == Some(value) {
            self.remove(field);
            return;
        }
        self.set(field, value, label);
    }

    /// Установить значение фильтра; пустое значение снимает фильтр
    pub fn set(&mut self, field: &str, value: &str, label: &str) {
        self.remove(field);
        if !value.is_empty() {
            self.chips.push(FilterChip {
                field: field.to_string(),
                value: value.to_string(),
                label: label.to_string(),
            });
        }
    }

    pub fn remove(&mut self, field: &str) {
        self.chips.retain(|c| c.field != field);
    }

    pub fn clear(&mut self) {
        self.chips.clear();
        self.search.clear();
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Поиск считается активным только с `MIN_SEARCH_LEN` символов
    pub fn is_search_active(&self) -> bool {
        self.search.trim().chars().count() >= MIN_SEARCH_LEN
    }

    pub fn value_of(&self, field: &str) -> Option<&str> {
        self.chips
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.value.as_str())
    }

    pub fn chips(&self) -> &[FilterChip] {
        &self.chips
    }

    /// Количество активных фильтров для бейджа (поиск тоже считается)
    pub fn active_count(&self) -> usize {
        self.chips.len() + usize::from(self.is_search_active())
    }

    /// Строка проходит все чипы (И) и поисковый запрос
    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        let chips_ok = self
            .chips
            .iter()
            .all(|c| item.filter_value(&c.field).as_deref() == Some(c.value.as_str()));
        if !chips_ok {
            return false;
        }
        if !self.is_search_active() {
            return true;
        }
        let needle = self.search.trim().to_lowercase();
        item.search_text()
            .iter()
            .any(|s| s.to_lowercase().contains(&needle))
    }

    pub fn apply<T: Filterable + Clone>(&self, items: &[T]) -> Vec<T> {
        items.iter().filter(|i| self.matches(*i)).cloned().collect()
    }

    /// Пары `(field, value)` для query string серверного списка
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .chips
            .iter()
            .map(|c| (c.field.clone(), c.value.clone()))
            .collect();
        if self.is_search_active() {
            pairs.push(("q".to_string(), self.search.trim().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Row {
        code: &'static str,
        status: &'static str,
        factory: &'static str,
    }

    impl Filterable for Row {
        fn filter_value(&self, field: &str) -> Option<String> {
            match field {
                "status" => Some(self.status.to_string()),
                "factory_id" => Some(self.factory.to_string()),
                _ => None,
            }
        }

        fn search_text(&self) -> Vec<String> {
            vec![self.code.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { code: "PUMP-01", status: "active", factory: "f1" },
            Row { code: "PUMP-02", status: "retired", factory: "f1" },
            Row { code: "FAN-01", status: "active", factory: "f2" },
        ]
    }

    #[test]
    fn test_toggle_adds_and_removes_chip() {
        let mut f = FilterSet::new();
        f.toggle("status", "active", "Активно");
        assert_eq!(f.active_count(), 1);
        assert_eq!(f.value_of("status"), Some("active"));
        f.toggle("status", "active", "Активно");
        assert_eq!(f.active_count(), 0);
    }

    #[test]
    fn test_toggle_replaces_value_of_same_field() {
        let mut f = FilterSet::new();
        f.toggle("status", "active", "Активно");
        f.toggle("status", "retired", "Списано");
        assert_eq!(f.chips().len(), 1);
        assert_eq!(f.value_of("status"), Some("retired"));
    }

    #[test]
    fn test_chips_are_combined_with_and() {
        let mut f = FilterSet::new();
        f.set("status", "active", "Активно");
        f.set("factory_id", "f1", "Завод 1");
        let found = f.apply(&rows());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "PUMP-01");
    }

    #[test]
    fn test_search_needs_min_length() {
        let mut f = FilterSet::new();
        f.set_search("p");
        assert_eq!(f.apply(&rows()).len(), 3);
        f.set_search("pu");
        assert_eq!(f.apply(&rows()).len(), 2);
        assert_eq!(f.active_count(), 1);
    }

    #[test]
    fn test_query_pairs() {
        let mut f = FilterSet::new();
        f.set("status", "active", "Активно");
        f.set_search(" fan ");
        assert_eq!(
            f.to_query_pairs(),
            vec![
                ("status".to_string(), "active".to_string()),
                ("q".to_string(), "fan".to_string())
            ]
        );
    }
}
