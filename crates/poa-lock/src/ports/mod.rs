//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: the validation entry point hosts call
//! - **Outbound (Driven)**: transaction access and verification module resolution

pub mod inbound;
pub mod outbound;
