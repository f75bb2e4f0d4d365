//! Reqwest-based HTTP client for the formsmith forms service.
//!
//! This crate provides [`ReqwestClient`], the HTTP implementation of
//! [`FormsProvider`](formsmith_core::FormsProvider).
//!
//! # Example
//!
//! ```rust,ignore
//! use formsmith_core::Session;
//! use formsmith_reqwest::{ReqwestClient, ReqwestConfig};
//!
//! let client = ReqwestClient::new(ReqwestConfig::default(), Session::in_memory())?;
//! let service = client.into_service();
//! let popular = service.popular_templates().await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod error;

pub use crate::client::ReqwestClient;
pub use crate::config::{DEFAULT_API_URL, ReqwestConfig};
pub use crate::error::{Error, Result};

/// Tracing target for HTTP client operations.
pub const TRACING_TARGET: &str = "formsmith_reqwest::client";
