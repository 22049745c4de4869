//! Выбор строк в таблицах (чекбоксы строк и «выбрать все»)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Состояние чекбокса в заголовке таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckState {
    None,
    Partial,
    All,
}

/// Набор выбранных идентификаторов строк
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn set(&mut self, id: &str, checked: bool) {
        if checked {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ids.extend(ids.into_iter().map(str::to_string));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Снять выбор только с указанных строк
    pub fn deselect_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Клик по чекбоксу заголовка: если выбраны не все переданные строки,
    /// выбрать их, иначе снять выбор с них же. Выбор на других страницах
    /// сохраняется.
    pub fn toggle_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str> + Clone) {
        if self.header_state(ids.clone()) == HeaderCheckState::All {
            self.deselect_all(ids);
        } else {
            self.select_all(ids);
        }
    }

    /// Состояние чекбокса заголовка относительно видимого набора строк
    pub fn header_state<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> HeaderCheckState {
        let mut total = 0usize;
        let mut selected = 0usize;
        for id in ids {
            total += 1;
            if self.ids.contains(id) {
                selected += 1;
            }
        }
        if total == 0 || selected == 0 {
            HeaderCheckState::None
        } else if selected == total {
            HeaderCheckState::All
        } else {
            HeaderCheckState::Partial
        }
    }

    /// Удалить из выбора строки, которых больше нет в наборе данных
    pub fn reconcile<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let present: BTreeSet<&str> = ids.into_iter().collect();
        self.ids.retain(|id| present.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Выбранные id в отсортированном порядке
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut sel = Selection::new();
        sel.toggle("a");
        assert!(sel.is_selected("a"));
        sel.toggle("a");
        assert!(!sel.is_selected("a"));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_header_state() {
        let mut sel = Selection::new();
        assert_eq!(sel.header_state(ROWS), HeaderCheckState::None);
        sel.set("b", true);
        assert_eq!(sel.header_state(ROWS), HeaderCheckState::Partial);
        sel.select_all(ROWS);
        assert_eq!(sel.header_state(ROWS), HeaderCheckState::All);
        assert_eq!(sel.header_state(Vec::<&str>::new()), HeaderCheckState::None);
    }

    #[test]
    fn test_toggle_all_selects_then_clears() {
        let mut sel = Selection::new();
        sel.set("a", true);
        sel.toggle_all(ROWS);
        assert_eq!(sel.len(), 3);
        sel.toggle_all(ROWS);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_toggle_all_keeps_other_pages() {
        let mut sel = Selection::new();
        sel.toggle_all(["a", "b"]);
        sel.toggle_all(["c", "d"]);
        assert_eq!(sel.len(), 4);
        sel.toggle_all(["c", "d"]);
        assert_eq!(sel.ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sel.header_state(["a", "b"]), HeaderCheckState::All);
    }

    #[test]
    fn test_reconcile_drops_missing_rows() {
        let mut sel = Selection::new();
        sel.select_all(ROWS);
        sel.reconcile(["a", "c", "d"]);
        assert_eq!(sel.ids(), vec!["a".to_string(), "c".to_string()]);
    }
}
