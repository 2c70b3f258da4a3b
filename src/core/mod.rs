//! # Core Application Logic
//!
//! This module contains the client's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • flows & slices       │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │    api     │
//!         │  Adapter   │                  │ (reqwest)  │
//!         │ (ratatui)  │                  │            │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct - all application state in one place
//! - [`action`]: The `Action` enum - everything that can happen in the app
//! - [`booking`]: The availability/slot selection state machine
//! - [`sessions`]: Cancel and reschedule flows
//! - [`store`]: The per-resource slices
//! - [`search`], [`notifications`], [`profile`], [`config`]

pub mod action;
pub mod booking;
pub mod config;
pub mod notifications;
pub mod profile;
pub mod search;
pub mod sessions;
pub mod state;
pub mod store;
