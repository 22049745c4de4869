//! Форматирование дат для таблиц и карточек

use chrono::{DateTime, Local, NaiveDate, Utc};

/// `2024-03-15` -> `15.03.2024`
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn format_date_opt(date: Option<&NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "—".to_string())
}

/// Время в локальной зоне браузера, без секунд
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

pub fn format_datetime_opt(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| "—".to_string())
}

/// Значение для `<input type="date">`
pub fn to_input_value(date: Option<&NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Разбор значения `<input type="date">`; пустая строка даёт `None`
pub fn parse_input_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Сегодня по часам браузера
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Простой: `45 мин`, `2 ч 05 мин`, `1 д 3 ч`
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let mins = minutes % 60;
    match (days, hours) {
        (0, 0) => format!("{} мин", mins),
        (0, h) => format!("{} ч {:02} мин", h, mins),
        (d, h) => format!("{} д {} ч", d, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(&d), "05.03.2024");
        assert_eq!(format_date_opt(None), "—");
    }

    #[test]
    fn test_input_value() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(to_input_value(Some(&d)), "2024-12-31");
        assert_eq!(parse_input_value("2024-12-31"), Some(d));
        assert_eq!(parse_input_value(""), None);
        assert_eq!(parse_input_value("31.12.2024"), None);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45 мин");
        assert_eq!(format_minutes(125), "2 ч 05 мин");
        assert_eq!(format_minutes(27 * 60 + 10), "1 д 3 ч");
    }
}
