//! Agent module for reactqa
//!
//! This module contains the ReAct loop controller, the session state it
//! owns, the action parser, the termination policy and the observation
//! hooks.

pub mod core;
pub mod metrics;
pub mod observer;
pub mod parser;
pub mod state;
pub mod termination;

pub use core::{Agent, LoopState};
pub use metrics::MetricsObserver;
pub use observer::{AgentObserver, NoopObserver, Observers, TracingObserver};
pub use parser::{parse_response, Action};
pub use state::{QaResult, SessionState, Step};
pub use termination::{should_force_final_answer, TerminationReason};
