//! Shared wire types for the Parley voice relay.
//!
//! Every type here is a request-scoped value: it is built from an inbound
//! HTTP body or produced by a handler, serialized once, and dropped. Nothing
//! in this crate is persisted.
//!
//! Both `parley-voice` and `parley-server` depend on this crate so that the
//! credential issuer and the HTTP layer agree on the JSON shapes.

pub mod api;

pub use api::{
    ChatRequest, ConversationReply, Credential, ServiceStatus, TokenRequest, TranscriptionResult,
};
