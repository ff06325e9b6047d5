//! Adapters layer: concrete sources for the catalog/discount/order ports
//! (in-memory, file-based, HTTP) plus the legacy wire-record mapping.

pub mod files;
pub mod http;
pub mod memory;
pub mod wire;
