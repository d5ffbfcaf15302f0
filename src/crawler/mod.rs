//! # Crawler Module
//!
//! Implements the breadth-first crawling engine.
//!
//! ## Overview
//!
//! The crawler module provides the public [`Crawler`] facade and the
//! per-call [`CrawlSession`](session::CrawlSession) that drives one crawl.
//! The facade is long-lived and owns the two worker pools; every
//! `download` call spins up a fresh session holding that call's visited
//! set, frontier, host gates and result accumulators.
//!
//! ## Architecture
//!
//! Work flows level by level: the session deduplicates the frontier, hands
//! each admitted URL to its per-host gate, the gate feeds the download
//! pool, successful downloads spawn extraction jobs on the extraction
//! pool, and a rendezvous barrier holds the session back until every unit
//! of the level has finished.

mod core;
pub(crate) mod session;

pub use core::Crawler;
