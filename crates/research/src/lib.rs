//! Dependency-ordered research scheduling for scaffold.
//!
//! After task generation, every task gets a round of research (typically an
//! LLM call) whose output feeds the research of the tasks that depend on it.
//! This crate decides the order from a [`DependencyGraph`] and drives an
//! injected [`Researcher`]:
//!
//! - [`ResearchPlan`] groups tasks into levels; a task only appears after all
//!   of its prerequisites. A cyclic graph falls back to the original task
//!   order, one task at a time, instead of failing.
//! - [`ResearchRunner`] executes a plan level by level, running the tasks of a
//!   level concurrently and handing each task the notes of its prerequisites.
//!
//! The researcher is passed in explicitly; nothing here holds a global client.
//!
//! [`DependencyGraph`]: scaffold_task_graph::DependencyGraph

mod error;
mod plan;
mod runner;

pub use error::{BoxError, Error, Result};
pub use plan::ResearchPlan;
pub use runner::{
    PrerequisiteNote, ResearchConfig, ResearchReport, ResearchRequest, ResearchRunner, Researcher,
};
