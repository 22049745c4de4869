//! Схема колонок адаптивной таблицы: таблица на десктопе, карточки на мобильных

use serde::{Deserialize, Serialize};

use super::pagination::{clamp_page, paginate, total_pages};

/// Ширина окна, начиная с которой показывается обычная таблица
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Как колонка отображается в мобильной карточке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnPriority {
    /// Заголовок карточки
    Title,
    /// Основное поле карточки
    Primary,
    /// Второстепенное поле (ниже основных)
    Secondary,
    /// Только в десктопной таблице
    DesktopOnly,
}

/// Режим отображения списка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    Table,
    Cards,
}

/// Выбрать режим по ширине окна
pub fn layout_for_width(width_px: u32) -> LayoutMode {
    if width_px < MOBILE_BREAKPOINT_PX {
        LayoutMode::Cards
    } else {
        LayoutMode::Table
    }
}

/// Описание колонки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub title: String,
    pub priority: ColumnPriority,
}

impl ColumnDef {
    pub fn new(key: &str, title: &str, priority: ColumnPriority) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            priority,
        }
    }
}

/// Раскладка карточки: ключ заголовка и ключи полей в порядке вывода
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub title: Option<String>,
    pub fields: Vec<String>,
}

/// Сопоставить колонки полям карточки.
///
/// Заголовок — первая колонка `Title`, а если её нет — первая колонка,
/// которая не `DesktopOnly`. Поля: сначала `Primary`, затем `Secondary`,
/// в порядке схемы; колонка-заголовок в поля не попадает.
pub fn card_layout(columns: &[ColumnDef]) -> CardLayout {
    let title = columns
        .iter()
        .find(|c| c.priority == ColumnPriority::Title)
        .or_else(|| {
            columns
                .iter()
                .find(|c| c.priority != ColumnPriority::DesktopOnly)
        })
        .map(|c| c.key.clone());

    let mut fields = Vec::new();
    for priority in [ColumnPriority::Primary, ColumnPriority::Secondary] {
        for column in columns.iter().filter(|c| c.priority == priority) {
            if title.as_deref() != Some(column.key.as_str()) {
                fields.push(column.key.clone());
            }
        }
    }

    CardLayout { title, fields }
}

/// Колонки, видимые в режиме таблицы (все колонки схемы)
pub fn table_columns(columns: &[ColumnDef]) -> Vec<&ColumnDef> {
    columns.iter().collect()
}

/// Режим пагинации таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Таблица сама режет переданный массив
    Client { page_size: usize },
    /// Строки уже отрезаны сервером, таблица только сообщает о смене страницы
    Server { total_pages: usize, page_size: usize },
    /// Без пагинации
    None,
}

impl PaginationMode {
    /// Количество страниц для `row_count` переданных строк
    pub fn page_count(&self, row_count: usize) -> usize {
        match self {
            PaginationMode::Client { page_size } => total_pages(row_count, *page_size),
            PaginationMode::Server { total_pages, .. } => (*total_pages).max(1),
            PaginationMode::None => 1,
        }
    }

    /// Строки, которые нужно отрисовать на странице `page`
    pub fn visible_rows<T: Clone>(&self, rows: &[T], page: usize) -> Vec<T> {
        match self {
            PaginationMode::Client { page_size } => paginate(rows, page, *page_size),
            PaginationMode::Server { .. } | PaginationMode::None => rows.to_vec(),
        }
    }

    /// Размер страницы для переключателя; без пагинации это число строк
    pub fn page_size(&self, row_count: usize) -> usize {
        match self {
            PaginationMode::Client { page_size } | PaginationMode::Server { page_size, .. } => {
                *page_size
            }
            PaginationMode::None => row_count,
        }
    }

    /// Страница, приведённая к допустимому диапазону
    pub fn clamp(&self, page: usize, row_count: usize) -> usize {
        clamp_page(page, self.page_count(row_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("code", "Код", ColumnPriority::Secondary),
            ColumnDef::new("name", "Наименование", ColumnPriority::Title),
            ColumnDef::new("status", "Статус", ColumnPriority::Primary),
            ColumnDef::new("created", "Создано", ColumnPriority::DesktopOnly),
        ]
    }

    #[test]
    fn test_breakpoint() {
        assert_eq!(layout_for_width(375), LayoutMode::Cards);
        assert_eq!(layout_for_width(767), LayoutMode::Cards);
        assert_eq!(layout_for_width(768), LayoutMode::Table);
        assert_eq!(layout_for_width(1440), LayoutMode::Table);
    }

    #[test]
    fn test_card_layout_orders_fields() {
        let layout = card_layout(&schema());
        assert_eq!(layout.title.as_deref(), Some("name"));
        assert_eq!(layout.fields, vec!["status".to_string(), "code".to_string()]);
    }

    #[test]
    fn test_card_title_falls_back_to_first_visible_column() {
        let columns = vec![
            ColumnDef::new("created", "Создано", ColumnPriority::DesktopOnly),
            ColumnDef::new("code", "Код", ColumnPriority::Primary),
            ColumnDef::new("status", "Статус", ColumnPriority::Primary),
        ];
        let layout = card_layout(&columns);
        assert_eq!(layout.title.as_deref(), Some("code"));
        assert_eq!(layout.fields, vec!["status".to_string()]);
    }

    #[test]
    fn test_client_pagination_slices_rows() {
        let rows: Vec<u32> = (0..23).collect();
        let mode = PaginationMode::Client { page_size: 10 };
        assert_eq!(mode.page_count(rows.len()), 3);
        assert_eq!(mode.visible_rows(&rows, 2), vec![20, 21, 22]);
        assert_eq!(mode.clamp(8, rows.len()), 2);
    }

    #[test]
    fn test_server_pagination_keeps_rows() {
        let rows = vec!["a", "b"];
        let mode = PaginationMode::Server {
            total_pages: 5,
            page_size: 50,
        };
        assert_eq!(mode.page_count(rows.len()), 5);
        assert_eq!(mode.visible_rows(&rows, 3), rows);
        let empty = PaginationMode::Server {
            total_pages: 0,
            page_size: 50,
        };
        assert_eq!(empty.page_count(0), 1);
    }

    #[test]
    fn test_page_size_on_short_last_page() {
        // последняя серверная страница короче выбранного размера
        let mode = PaginationMode::Server {
            total_pages: 3,
            page_size: 50,
        };
        assert_eq!(mode.page_size(7), 50);
        assert_eq!(PaginationMode::Client { page_size: 20 }.page_size(3), 20);
        assert_eq!(PaginationMode::None.page_size(3), 3);
    }

    #[test]
    fn test_table_keeps_all_columns() {
        assert_eq!(table_columns(&schema()).len(), 4);
    }
}
