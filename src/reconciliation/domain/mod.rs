pub mod derived_fields;
pub mod finding_ref;
pub mod json_path;

pub use derived_fields::DerivedFields;
pub use finding_ref::FindingRef;
