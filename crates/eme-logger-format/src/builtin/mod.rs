//! Built-in formatters for common EME payloads.
//!
//! - [`ClearKeyFormatter`]: Clear Key license requests and licenses
//! - [`HexDumpFormatter`]: raw byte payloads for any key system

mod clearkey;
mod hexdump;

pub use clearkey::ClearKeyFormatter;
pub use hexdump::HexDumpFormatter;
