//! Templates: authoring, the flat storage layout, and display.

mod draft;
mod field;
mod question;
mod record;

pub use draft::{CreateTemplate, TemplateDraft};
pub use field::{CustomField, FieldKind, FieldUpdate};
pub use question::{QuestionBlock, slot_label};
pub use record::{
    FlatRecord, QuestionSlot, TemplateRecord, decode_slots, encode_fields, is_truthy, write_slots,
};
