mod view;
mod view_model;

pub use view::IncidentDetails;
pub use view_model::IncidentDetailsViewModel;
