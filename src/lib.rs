//! remotarr library
//!
//! Data, network, and state core for driving Sonarr and Radarr servers from
//! a registry of user-entered connections: per-kind API clients, repository
//! wrappers that box faults into screen text, observable view-state cells,
//! and the persisted server registry.

pub mod http;
pub mod models;
pub mod radarr;
pub mod registry;
pub mod repository;
pub mod sonarr;
pub mod state;
