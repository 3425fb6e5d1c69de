// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, Chrome trace export, and JSON settings for
//! cairn diagnostics.
//!
//! This crate provides [`SyncTraceSink`](cairn_core::trace::SyncTraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! [`config::JsonSettings`] loads persisted debug settings from a JSON
//! document for [`NavigationDebugServer::init`](cairn_core::server::NavigationDebugServer::init).

pub mod chrome;
pub mod config;
pub mod pretty;
pub mod recorder;
