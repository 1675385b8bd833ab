//! Distance sensor implementations

pub mod ping;

pub use ping::PingSensor;
