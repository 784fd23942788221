//! Measurement page decoding.

use aqstream_types::MeasurementRecord;
use serde::Deserialize;

use crate::FetchError;

/// One page of results from the measurements endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records on this page, in server order.
    pub records: Vec<MeasurementRecord>,
    /// Total number of records the server reports for the whole query.
    pub found: u64,
}

#[derive(Deserialize)]
struct Body {
    results: Vec<MeasurementRecord>,
    meta: Meta,
}

#[derive(Deserialize)]
struct Meta {
    found: u64,
}

/// Decodes a response body into a [`Page`].
///
/// The body must be a JSON object with a `results` array and an unsigned
/// integer at `meta.found`; other fields are ignored.
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] if the body does not have that shape.
pub fn parse_page(page: u32, body: &[u8]) -> Result<Page, FetchError> {
    let body: Body = serde_json::from_slice(body).map_err(|e| FetchError::Malformed {
        page,
        reason: e.to_string(),
    })?;

    Ok(Page {
        records: body.results,
        found: body.meta.found,
    })
}
