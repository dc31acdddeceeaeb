//! Client core for a REST collection of `{id, name, data}` objects.
//!
//! # Overview
//! `ObjectClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). A
//! `Transport` executes them; `ObjectsApi` glues the two together, and
//! `CollectionStore` keeps the client-side view of the collection: merged
//! record list, local pagination, selection and the create/update/delete
//! lifecycle with optimistic deletes.
//!
//! # Design
//! - `ObjectClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable with canned responses.
//! - Record DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.
//! - Store state is published through a `tokio::sync::watch` channel.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod page;
pub mod payload;
pub mod store;
pub mod transport;
pub mod types;

pub use api::ObjectsApi;
pub use client::ObjectClient;
pub use config::ClientConfig;
pub use error::{ApiError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{format_payload, is_valid_payload, parse_payload, PayloadError};
pub use store::{CollectionState, CollectionStore, Phases};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{classify_id, is_reserved_id, Payload, Record, RecordKind};
