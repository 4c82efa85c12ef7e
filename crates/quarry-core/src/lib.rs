//! quarry-core
//!
//! Core building blocks for the quarry collection runtime: a tick-driven
//! queue of "collect N units of resource X" jobs executed through an
//! external pathing/automation engine.
//!
//! # Module layout
//! - **domain**: job lifecycle, phases, progress accounting, resource ids
//! - **ports**: collaborator contracts (engine, catalog, inventory, notifier)
//! - **app**: queue manager, command router, tick driver
//! - **impls**: simulation collaborators for development and tests

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;

pub use error::QuarryError;
