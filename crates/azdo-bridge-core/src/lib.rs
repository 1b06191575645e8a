pub mod config;
pub mod error;
pub mod importer;
pub mod model;
pub mod naming;
pub mod provider;
#[cfg(test)]
mod testing;
pub mod trigger;
pub mod wharf;
