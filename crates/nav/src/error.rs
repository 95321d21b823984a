use thiserror::Error;

use crate::back_stack::BackStackError;
use crate::graph::GraphError;

/// Navigation failures surfaced to callers.
///
/// Every variant is a wiring mistake by the application author. Recoverable
/// "can't handle this here" outcomes are reported through `bool` returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
	/// No host in the controller chain accepts the page type.
	#[error("destination `{page_type}` is unreachable from this controller")]
	Unreachable { page_type: String },
	/// `pop_up_to` for a page type no host in the chain knows.
	#[error("page type `{page_type}` is unknown to every host in the chain")]
	UnknownPageType { page_type: String },
	/// The host was given a page type it does not register.
	#[error("page type `{page_type}` is not registered in this host")]
	NotRegistered { page_type: String },
	#[error("a stack host needs at least one initial page")]
	EmptyInitialStack,
	#[error("host has been torn down")]
	TornDown,
	#[error(transparent)]
	Graph(#[from] GraphError),
	#[error(transparent)]
	BackStack(#[from] BackStackError),
}

pub type Result<T, E = NavError> = std::result::Result<T, E>;
