//! Постраничный вывод списков: общие правила для клиента и сервера

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Количество страниц для `total` записей; пустой список — одна страница
pub fn total_pages(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    if total == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Прижать номер страницы (с нуля) к диапазону `0..total_pages`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.max(1) - 1)
}

/// Вырезать страницу из полного списка (клиентская пагинация)
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let page_size = page_size.max(1);
    let page = clamp_page(page, total_pages(items.len(), page_size));
    let start = page * page_size;
    let end = (start + page_size).min(items.len());
    items.get(start..end).unwrap_or(&[]).to_vec()
}

/// Параметры запроса страницы (query string)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Применить запрос к уже отфильтрованному списку
    pub fn apply<T: Clone>(&self, items: Vec<T>) -> ListResponse<T> {
        let total = items.len();
        let page_size = self.page_size.max(1);
        let pages = total_pages(total, page_size);
        let page = clamp_page(self.page, pages);
        ListResponse {
            items: paginate(&items, page, page_size),
            total,
            page,
            page_size,
            total_pages: pages,
        }
    }
}

/// Ответ постраничного списка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 1,
        }
    }
}

impl<T> ListResponse<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(10, 0), 10);
        assert_eq!(total_pages(usize::MAX, 2), usize::MAX / 2 + 1);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 0);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 3), 2);
        assert_eq!(clamp_page(5, 0), 0);
    }

    #[test]
    fn test_paginate_slices_and_clamps() {
        let data: Vec<u32> = (1..=12).collect();
        assert_eq!(paginate(&data, 0, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(&data, 2, 5), vec![11, 12]);
        // за последней страницей — последняя страница
        assert_eq!(paginate(&data, 9, 5), vec![11, 12]);
        assert!(paginate::<u32>(&[], 3, 5).is_empty());
    }

    #[test]
    fn test_page_request_apply() {
        let data: Vec<u32> = (0..30).collect();
        let resp = PageRequest::new(4, 10).apply(data);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total, 30);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.items.first(), Some(&20));
        assert!(resp.has_prev());
        assert!(!resp.has_next());
    }
}
