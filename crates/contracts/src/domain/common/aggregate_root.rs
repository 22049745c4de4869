use super::EntityMetadata;

/// Трейт для корня агрегата
///
/// Определяет обязательные методы и метаданные для всех агрегатов системы
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id;

    // ============================================================================
    // Методы экземпляра (данные конкретной записи)
    // ============================================================================

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Получить бизнес-код записи (например, "EQ-0001")
    fn code(&self) -> &str;

    /// Получить описание/название записи
    fn description(&self) -> &str;

    /// Получить метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Получить изменяемые метаданные
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    // ============================================================================
    // Метаданные класса агрегата (статические данные)
    // ============================================================================

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД и API (например, "factory")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI (единственное число, например, "Завод")
    fn element_name() -> &'static str;

    /// Имя списка для UI (множественное число, например, "Заводы")
    fn list_name() -> &'static str;

    /// Префикс бизнес-кода для новых записей (например, "FAC")
    fn code_prefix() -> &'static str;

    // ============================================================================
    // Методы с реализацией по умолчанию
    // ============================================================================

    /// Полное имя агрегата для системы (например, "a001_factory")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Префикс для таблиц БД (например, "a001_factory_")
    fn table_prefix() -> String {
        format!("{}_", Self::full_name())
    }

    /// Сгенерировать бизнес-код по порядковому номеру: `FAC-0007`
    fn format_code(seq: u64) -> String {
        format!("{}-{:04}", Self::code_prefix(), seq)
    }
}
