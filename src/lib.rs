//! Renamer Dash: a native dashboard for the AudioRenamer library organizer.
//!
//! The backend (scan engine, database updater, scheduler) is reached only
//! through its REST endpoints and the `/ws/logs` feed. This crate keeps a
//! consistent local view of that backend:
//!
//! - [`stream`]: reconnecting log stream with an explicit state machine
//! - [`poller`]: fixed-cadence status reconciliation with stale-response guard
//! - [`inventory`]: sorted, filtered, capped projection of the catalog
//! - [`state`] and [`dashboard`]: the state container and the runtime that feeds it
//!
//! Front ends live in [`app`]/[`ui`] (egui) and [`cli`].

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_store;
pub mod covers;
pub mod dashboard;
pub mod inventory;
pub mod model;
pub mod notify;
pub mod poller;
pub mod state;
pub mod stream;
pub mod task;
pub mod ui;
