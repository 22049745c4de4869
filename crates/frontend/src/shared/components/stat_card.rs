use crate::shared::icons::icon;
use leptos::prelude::*;

/// Тон карточки показателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatTone {
    #[default]
    Neutral,
    Good,
    Warning,
    Bad,
}

impl StatTone {
    fn class(&self) -> &'static str {
        match self {
            StatTone::Neutral => "stat-card",
            StatTone::Good => "stat-card stat-card--success",
            StatTone::Warning => "stat-card stat-card--warning",
            StatTone::Bad => "stat-card stat-card--error",
        }
    }
}

/// Формат значения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFormat {
    Integer,
    Percent,
}

pub fn format_thousands(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

fn format_value(val: f64, fmt: StatFormat) -> String {
    match fmt {
        StatFormat::Integer => format_thousands(val.round() as i64),
        StatFormat::Percent => format!("{:.1}%", val).replace('.', ","),
    }
}

#[component]
pub fn StatCard(
    #[prop(into)]
    label: String,
    /// Имя иконки для icon()
    #[prop(into)]
    icon_name: String,
    /// None пока данные грузятся
    #[prop(into)]
    value: Signal<Option<f64>>,
    format: StatFormat,
    #[prop(optional, into)]
    tone: Signal<StatTone>,
    #[prop(optional, into)]
    subtitle: Signal<Option<String>>,
    /// Клик по карточке (переход к списку)
    #[prop(optional)]
    on_click: Option<Callback<()>>,
) -> impl IntoView {
    let formatted = move || match value.get() {
        Some(v) => format_value(v, format),
        None => "—".to_string(),
    };

    view! {
        <div
            class=move || tone.get().class()
            class:stat-card--clickable=on_click.is_some()
            on:click=move |_| {
                if let Some(cb) = on_click {
                    cb.run(());
                }
            }
        >
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(1234567), "1\u{00a0}234\u{00a0}567");
        assert_eq!(format_thousands(-1500), "-1\u{00a0}500");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_value(87.26, StatFormat::Percent), "87,3%");
        assert_eq!(format_value(12.0, StatFormat::Integer), "12");
    }
}
