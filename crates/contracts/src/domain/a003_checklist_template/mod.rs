pub mod aggregate;

pub use aggregate::{
    ChecklistItem, ChecklistItemKind, ChecklistTemplate, ChecklistTemplateDto,
    ChecklistTemplateId, TemplateStatus,
};
