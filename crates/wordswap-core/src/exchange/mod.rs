//! Exchange module containing the plain-text rule list codec.

pub mod codec;

pub use codec::{export_text, import_text, ExchangeError};
