//! Schema domain - declarative field rules and the validator that walks them

mod errors;
mod merge;
mod rule;
mod validator;

pub use errors::FieldErrors;
pub use merge::{expand_dotted_paths, merge_patch};
pub use rule::{EnumRule, FieldKind, FieldRule, LengthLimit, PatternRule};
pub use validator::{parse_date, Schema, DOCUMENT_PATH};
