//! Status outputs

pub mod indicator;

pub use indicator::Indicator;
