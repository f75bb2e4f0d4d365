#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for model decoding.
pub const TRACING_TARGET: &str = "formsmith_core";

mod error;
mod provider;
mod service;

pub mod auth;
pub mod listing;
pub mod session;
pub mod template;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use provider::FormsProvider;
pub use service::FormsService;
pub use session::{BearerToken, Session};
