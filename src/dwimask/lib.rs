//! # dwimask Architecture
//!
//! dwimask derives a brain mask from a diffusion-weighted image series by
//! orchestrating MRtrix3 and ANTs. It performs no voxel processing itself:
//! every step is an external command run in a scratch directory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints messages, owns the exit code    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Absolutizes user paths, merges configuration             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Preflight checks, staging, the fixed tool sequence       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Runner Layer (runner/)                                     │
//! │  - CommandRunner trait                                      │
//! │  - SystemRunner (production), RecordingRunner (testing)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure model
//!
//! Every error is fatal. Preflight (template option, output overwrite,
//! `ANTSPATH`, tool discovery) completes before any process is spawned.
//! After that, the first failing command aborts the run and the scratch
//! directory is kept for inspection.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: The `ants` algorithm
//! - [`runner`]: External process execution
//! - [`tools`]: Executable discovery and `ANTSPATH`
//! - [`header`]: `mrinfo` header parsing and output stride derivation
//! - [`scratch`]: Scratch directory lifecycle
//! - [`model`]: Shared request types (`Verbosity`, `TemplatePair`, ...)
//! - [`config`]: Layered configuration
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod header;
pub mod logging;
pub mod model;
pub mod runner;
pub mod scratch;
pub mod tools;
