/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```ignore
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Длительность простоя: `45 мин`, `2 ч 05 мин`, `1 д 3 ч`
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
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0 мин");
        assert_eq!(format_minutes(45), "45 мин");
        assert_eq!(format_minutes(125), "2 ч 05 мин");
        assert_eq!(format_minutes(27 * 60 + 10), "1 д 3 ч");
        assert_eq!(format_minutes(-5), "0 мин");
    }
}
