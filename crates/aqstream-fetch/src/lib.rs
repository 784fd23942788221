//! HTTP client and pagination for the aqstream measurement pipeline.
//!
//! This crate provides the upstream half of the pipeline:
//!
//! - [`url::measurement_query`] - Builds the measurements query string
//! - [`FetchClient`] - HTTP client with timeouts, connection pooling and retries
//! - [`parse_page`] - Validates and decodes one response page
//! - [`PageSource`] - Seam between the pagination driver and the network
//! - [`fetch_all_for_date`] - Walks every page of a day's result set

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/aqstream/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod paginate;
mod parse;
pub mod url;

pub use client::{ClientConfig, FetchClient, FetchError};
pub use paginate::{DateFetch, PageSource, Truncation, fetch_all_for_date};
pub use parse::{Page, parse_page};
