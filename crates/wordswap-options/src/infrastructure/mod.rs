//! Infrastructure layer for the options application.
//!
//! Contains the concrete key-value stores, the TOML application config, and
//! the command bridge used by front ends.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `wordswap_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod storage;
pub mod ui_bridge;
