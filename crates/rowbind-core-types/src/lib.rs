//! Core types shared across rowbind facilities
//!
//! This crate provides the canonical schema constants used by the
//! logging facility and the error facility, so every crate emits the
//! same field keys and event names.

pub mod schema;
