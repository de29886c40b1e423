//! # qsy-gateway
//!
//! HTTP and WebSocket gateway relaying operator QSY commands to radio
//! hardware interfaces that keep a WebSocket open to the server.
//!
//! A command request names a device and a frequency, and optionally a
//! lookup table from which the operating mode for that frequency is
//! derived. The gateway resolves the mode, finds the device's live
//! connection, and pushes a JSON command to it.
//!
//! ## Architecture
//!
//! ```text
//! Operators (HTTP)            Devices (WebSocket)
//!     │                            │
//!     ├── REST Handlers (api/)     ├── Connection lifecycle (ws/)
//!     │                            │
//!     ├── CommandDispatcher (service/)
//!     │       │                    │
//!     │       ├── ModeResolver ── LookupTableCache ── LookupTableSource (tables/)
//!     │       │
//!     └───────┴── ConnectionRegistry (domain/) ◄──┘
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod tables;
pub mod ws;
