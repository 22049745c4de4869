//! Карточка шаблона чек-листа с редактором пунктов и версиями

mod view;
mod view_model;

pub use view::ChecklistTemplateDetails;
pub use view_model::ChecklistTemplateDetailsViewModel;
