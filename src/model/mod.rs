//! Data model for tabular data representation

mod dataset;
mod key;
mod value;

pub use dataset::{Dataset, Row};
pub use key::Key;
pub use value::Value;
