//! # Blog Shared
//!
//! Wire types shared by the server and its clients: request bodies and the
//! `{success, ...}` response envelopes.

pub mod dto;
pub mod response;

pub use response::{AckResponse, BlogListResponse, BlogResponse, ErrorDetail, ErrorResponse};
