//! Справочники для выпадающих списков и подстановки наименований в таблицах

use contracts::domain::a003_checklist_template::TemplateStatus;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::{a001_factory, a002_equipment, a003_checklist_template};
use crate::system::users;

/// Пары `(id, подпись)`, отсортированные по подписи
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    entries: Vec<(String, String)>,
}

impl Lookup {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));
        Self { entries }
    }

    /// Подпись по id; неизвестный id показывается как есть
    pub fn name(&self, id: &str) -> String {
        if id.is_empty() {
            return "—".to_string();
        }
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn name_opt(&self, id: Option<&str>) -> String {
        self.name(id.unwrap_or_default())
    }

    pub fn options(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load<F>(what: &'static str, fut: F) -> RwSignal<Lookup>
where
    F: std::future::Future<Output = Result<Lookup, String>> + 'static,
{
    let target = RwSignal::new(Lookup::default());
    spawn_local(async move {
        match fut.await {
            Ok(lookup) => target.set(lookup),
            Err(e) => log::warn!("lookup {}: {}", what, e),
        }
    });
    target
}

pub fn factory_lookup() -> RwSignal<Lookup> {
    load("factories", async {
        let items = a001_factory::api::fetch_all().await?;
        Ok(Lookup::new(
            items.iter().map(|f| (f.base.id.as_string(), f.base.description.clone())),
        ))
    })
}

/// Оборудование в виде «код · наименование»
pub fn equipment_lookup() -> RwSignal<Lookup> {
    load("equipment", async {
        let items = a002_equipment::api::fetch_all(None).await?;
        Ok(Lookup::new(items.iter().map(|e| {
            (
                e.base.id.as_string(),
                format!("{} · {}", e.base.code, e.base.description),
            )
        })))
    })
}

/// Шаблоны чек-листов; `active_only` оставляет только действующие
pub fn template_lookup(active_only: bool) -> RwSignal<Lookup> {
    load("checklist templates", async move {
        let items = a003_checklist_template::api::fetch_all().await?;
        Ok(Lookup::new(
            items
                .iter()
                .filter(|t| !active_only || t.status == TemplateStatus::Active)
                .map(|t| (t.base.id.as_string(), t.display_name())),
        ))
    })
}

pub fn assignee_lookup() -> RwSignal<Lookup> {
    load("assignees", async {
        let items = users::api::fetch_assignees().await?;
        Ok(Lookup::new(
            items.iter().map(|u| (u.id.clone(), u.display_name().to_string())),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> Lookup {
        Lookup::new(vec![
            ("2".to_string(), "Насос".to_string()),
            ("1".to_string(), "компрессор".to_string()),
        ])
    }

    #[test]
    fn test_options_sorted_by_label() {
        let labels: Vec<_> = lookup().options().into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["компрессор", "Насос"]);
    }

    #[test]
    fn test_name_fallbacks() {
        let l = lookup();
        assert_eq!(l.name("2"), "Насос");
        assert_eq!(l.name("99"), "99");
        assert_eq!(l.name(""), "—");
        assert_eq!(l.name_opt(None), "—");
    }
}
