//! # eventlog — buffering-and-delivery core for runtime tracing
//!
//! This crate is the delivery backbone of a runtime tracing subsystem: it
//! accepts a high-frequency stream of opaque, pre-serialized binary event
//! records from many concurrent producer threads (one per execution unit
//! of the host runtime) and delivers them to a configurable sink without
//! ever blocking or crashing the producers.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Producer Threads (host runtime)          │
//! │            deliver(record: pre-serialized bytes)          │
//! └───────────────────────────┬───────────────────────────────┘
//!                             ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │              EventLogContext (one process lock)           │
//! │                                                           │
//! │   ┌─────────────┐      routes to exactly one target       │
//! │   │ SinkRouter  │──┬─▶ File      (sync write, OS          │
//! │   └─────────────┘  │             backpressure)            │
//! │                    ├─▶ Callback  (pushed outside the      │
//! │                    │             lock, no buffering)      │
//! │                    ├─▶ PullQueue (ChunkedBuffer,          │
//! │                    │             bounded, drop-newest)    │
//! │                    └─▶ Disabled  (silent discard)         │
//! └───────────────────────────┬───────────────────────────────┘
//!                             ▼  pop_chunk() polling
//! ┌───────────────────────────────────────────────────────────┐
//! │              Consumer (external, pull model)              │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`context`](EventLogContext): the explicit, injectable context object —
//!   the public operation surface and the single process-wide lock
//! - [`chunked_buffer`]: append-only, pop-from-front chunk FIFO backing the
//!   pull-queue mode; the hardest correctness surface in the crate
//! - [`growable`]: generic order-preserving array for auxiliary runtime
//!   state tracked alongside event emission
//! - [`config`]: [`EventLogConfig`] (chunk granularity, chunk bound, format
//!   preamble)
//! - [`domain`]: shared vocabulary types ([`SinkKind`], [`RecordCallback`],
//!   [`DropStats`]) and [`EventLogError`]
//! - [`diagnostics`]: rate-limited warning gate for overload paths
//!
//! ## Delivery guarantees
//!
//! - Records are opaque byte spans; this crate neither imposes nor
//!   interprets any record format.
//! - Producer-facing operations never return errors and never panic: they
//!   complete or silently degrade (drops are counted and reported through
//!   rate-limited warnings).
//! - Pull-queue bytes drain in exact FIFO order; the only bytes withheld
//!   from the consumer are those in a not-yet-full tail chunk.
//! - Under sustained overload the pull queue favors availability and
//!   bounded memory over completeness: the newest bytes are dropped once
//!   the chunk bound is reached.
//!
//! ## Build-time disablement
//!
//! With the default `tracing` feature disabled, [`EventLogContext`] is
//! replaced by a link-compatible stub whose operations are safe no-ops, so
//! host-runtime call sites compile identically in both configurations.

pub mod chunked_buffer;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod growable;

#[cfg(feature = "tracing")]
mod sink;

#[cfg(feature = "tracing")]
#[path = "context.rs"]
mod context_impl;

#[cfg(not(feature = "tracing"))]
#[path = "context_stub.rs"]
mod context_impl;

pub use chunked_buffer::{Chunk, ChunkedBuffer};
pub use config::{EventLogConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CHUNKS};
pub use context_impl::EventLogContext;
pub use domain::{DropStats, EventLogError, RecordCallback, SinkKind};
pub use growable::GrowableArray;
