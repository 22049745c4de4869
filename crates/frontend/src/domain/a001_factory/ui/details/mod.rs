//! Карточка завода
//!
//! - view_model.rs: состояние формы и команды загрузки/сохранения
//! - view.rs: компонент формы

mod view;
mod view_model;

pub use view::FactoryDetails;
pub use view_model::FactoryDetailsViewModel;
