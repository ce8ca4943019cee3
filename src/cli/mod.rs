//! CLI infrastructure for the smartcab trainer
//!
//! This module provides the command-line interface for training the driving
//! agent and reporting its trial histories.

pub mod commands;
pub mod config;
pub mod output;
