// Аутентификация
pub mod auth;

// Пользователи и роли
pub mod users;

// Планировщик ТО
pub mod scheduler;
