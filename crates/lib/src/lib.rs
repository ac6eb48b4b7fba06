//! lathe-lib: Core types and logic for lathe
//!
//! This crate provides the building blocks of the lathe build orchestrator:
//! - `Config`: the immutable configuration resolved once per process
//! - `TaskGraph` / `Scheduler`: named tasks with prerequisites, run depth first
//! - `BuildPlan`: the fully resolved description of one build variant
//! - `Toolchain`: the external compiler, bundler, test runner, linter and
//!   declaration installer the orchestrator drives

pub mod clean;
pub mod config;
pub mod consts;
pub mod dist;
pub mod install;
pub mod pipeline;
pub mod task;
pub mod tools;
pub mod util;
pub mod variant;
pub mod workflow;
