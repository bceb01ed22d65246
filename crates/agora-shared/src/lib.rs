//! # Agora Shared
//!
//! Wire types shared by the server and its clients: request bodies,
//! response envelopes and RFC 7807 problem documents.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, ListResponse};
