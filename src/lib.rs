//! Build evaluation for a fixed roster of squad-support weapons: upgrade catalogs, build
//! strings, table-driven stat resolution and the combat metrics derived from them.

pub mod build;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod export;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod presentation;
pub mod resolve;
pub mod server;
pub mod weapons;
