mod error;
pub mod metric;
pub mod probe;

pub use error::{Error, Result};
