//! Persistence of the configuration file
//!
//! The configuration file doubles as run state: each run reads it whole and
//! replaces it with the rewritten text.

pub mod file;

pub use file::ConfigFile;
