mod view;
mod view_model;

pub use view::EquipmentDetails;
pub use view_model::EquipmentDetailsViewModel;
