//! Hierarchical navigation engine.
//!
//! Keeps ordered back stacks of entries, decides which entries are alive and
//! at which lifecycle phase, and routes navigation requests across nested
//! hosts. Rendering is left to the caller: hosts publish [`NavBackStack`]
//! snapshots and wait for [`NavHostController::on_transition_finished`]
//! before destroying popped entries.
//!
//! # Core Types
//!
//! - [`NavController`] - handle screens navigate with; forwards to its parent
//! - [`StackNavHost`] / [`TabNavHost`] - the two [`NavHostController`]s
//! - [`NavEntry`] - one page occurrence with a phase and owned resources
//! - [`StackGraph`] / [`TabGraph`] - immutable destination registries
//!
//! # Modules
//!
//! - [`back_stack`] - ordered storage with stack algebra
//! - [`lifecycle`] - phases, host events, capping
//! - [`graph`] - destinations, builders, declarative specs
//! - [`host`] - stack and tab hosts
//! - [`controller`] - the controller tree

pub mod back_stack;
pub mod controller;
pub mod entry;
mod error;
pub mod graph;
pub mod host;
#[cfg(test)]
mod invariants;
pub mod lifecycle;
mod snapshot;

pub use back_stack::{BackStack, BackStackError};
pub use controller::{NavController, ObserverId};
pub use entry::{EntryId, NavEntry, Page, PageArgs, ResourceError, ResourceRegistry};
pub use error::{NavError, Result};
pub use graph::{GraphError, GraphSpec, StackDestination, StackGraph, TabDestination, TabGraph, Transition};
pub use host::{HostOptions, NavHostController, StackNavHost, StateListener, TabNavHost};
pub use lifecycle::{HostLifecycleEvent, LifecyclePhase};
pub use snapshot::NavBackStack;
