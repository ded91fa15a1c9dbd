pub mod formats;
pub mod json_utils;
pub mod merge;
pub mod schema;
pub mod tabular;
pub mod xml;

pub use formats::{convert_json, TargetFormat};
