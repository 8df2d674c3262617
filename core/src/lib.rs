//! Synchronous client core for the domain reseller HTTP API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - Request types declare a [`FieldTable`]: one directive per field and
//!   [`Channel`] (`add`, `modify`, `search`, …), plus validation rules.
//!   [`encode`], [`resolve`] and [`validate`] are generic over that table.
//! - Partial updates go through [`resolve`]: required fields left at zero
//!   are backfilled from the previously fetched value before encoding.
//! - Responses are decoded with tolerant scalars ([`codec`]) because the
//!   upstream quotes numbers and booleans inconsistently, and through an
//!   [`Envelope`] when records are keyed by id or by prefixed names.
//! - `ResellerClient` is stateless; each operation is a `build_*` /
//!   `parse_*` pair declared in the [`api`] module of its namespace.

pub mod api;
pub mod attributes;
pub mod client;
pub mod codec;
pub mod config;
pub mod encode;
pub mod envelope;
pub mod error;
pub mod field;
pub mod form;
pub mod http;
pub mod merge;
pub mod validate;
pub mod wire;

pub use attributes::EntityAttributes;
pub use client::{ApiCall, ResellerClient};
pub use config::{ClientConfig, Environment};
pub use encode::{encode, encode_versioned};
pub use envelope::Envelope;
pub use error::{ApiError, FieldViolation, FormatError};
pub use field::{Channel, FieldKind, FieldSpec, FieldTable, SchemaVersion, TagError};
pub use form::EncodedForm;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use merge::{resolve, resolve_versioned};
pub use validate::{validate, Rule};
pub use wire::{Mapped, WireValue};
