//! Record model: semantic types, values and declarations

pub mod record;
mod record_macro;
pub mod semantic_type;
pub mod value;

pub use record::{Declaration, FieldDecl, Record};
pub use semantic_type::{map_native_type, FieldType, SemanticType};
pub use value::{FromValue, Row, Value};
