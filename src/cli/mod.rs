//! CLI infrastructure for the Cluedo agent toolkit
//!
//! This module provides the command-line interface for simulating games
//! between knowledge-based agents.

pub mod commands;
pub mod output;
