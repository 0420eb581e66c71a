//! Grade record persistence
//!
//! The record collection lives behind a small REST surface (one JSON array
//! under a single key in a hosted key-value store):
//!
//! - `GET /grades` → full collection
//! - `POST /grades` → append, returns full updated collection
//! - `DELETE /grades/{index}` → delete by position, 400 on a bad index
//!
//! Addressing is strictly positional against the current snapshot and the
//! server does read-modify-write with no concurrency token, so concurrent
//! markers can silently lose writes. Single-marker-at-a-time tool.

use std::cell::RefCell;
use std::time::Duration;

use chrono::Utc;

use crate::error::{MarqError, Result};
use crate::record::GradeRecord;

/// Default timeout for store requests
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Operations the wizard and record subcommands need from the store
pub trait GradeStore {
    /// The full record collection; an empty store yields an empty list
    fn list(&self) -> Result<Vec<GradeRecord>>;

    /// Append a finalized record. The store stamps `saved_at` and returns
    /// the full updated collection.
    fn append(&self, record: &GradeRecord) -> Result<Vec<GradeRecord>>;

    /// Delete the record at `index`, returning the full updated collection.
    /// An out-of-range index fails with [`MarqError::InvalidIndex`] and
    /// leaves the collection unchanged.
    fn delete_at(&self, index: usize) -> Result<Vec<GradeRecord>>;
}

/// HTTP client for the hosted record store
pub struct HttpGradeStore {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpGradeStore {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let user_agent = format!(
            "marq/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        Self {
            base_url,
            timeout: Duration::from_secs(timeout_seconds),
            user_agent,
        }
    }

    fn grades_url(&self) -> String {
        format!("{}/grades", self.base_url)
    }

    fn grade_url(&self, index: usize) -> String {
        format!("{}/grades/{}", self.base_url, index)
    }

    fn parse_records(response: ureq::Response) -> Result<Vec<GradeRecord>> {
        response
            .into_json::<Vec<GradeRecord>>()
            .map_err(|e| MarqError::StoreTransport(format!("invalid response body: {}", e)))
    }

    fn status_error(status: u16, response: ureq::Response) -> MarqError {
        let body = response.into_string().unwrap_or_default();
        MarqError::StoreStatus { status, body }
    }
}

impl GradeStore for HttpGradeStore {
    fn list(&self) -> Result<Vec<GradeRecord>> {
        let url = self.grades_url();
        tracing::debug!(url = %url, "store_list");
        match ureq::get(&url)
            .set("Accept", "application/json")
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .call()
        {
            Ok(response) => Self::parse_records(response),
            Err(ureq::Error::Status(status, response)) => {
                Err(Self::status_error(status, response))
            }
            Err(ureq::Error::Transport(e)) => Err(MarqError::StoreTransport(e.to_string())),
        }
    }

    fn append(&self, record: &GradeRecord) -> Result<Vec<GradeRecord>> {
        let url = self.grades_url();
        tracing::debug!(url = %url, student = %record.draft.student_id, "store_append");
        let body = serde_json::to_string(record)?;
        match ureq::post(&url)
            .set("Content-Type", "application/json")
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .send_string(&body)
        {
            Ok(response) => Self::parse_records(response),
            Err(ureq::Error::Status(status, response)) => {
                Err(Self::status_error(status, response))
            }
            Err(ureq::Error::Transport(e)) => Err(MarqError::StoreTransport(e.to_string())),
        }
    }

    fn delete_at(&self, index: usize) -> Result<Vec<GradeRecord>> {
        let url = self.grade_url(index);
        tracing::debug!(url = %url, "store_delete");
        match ureq::delete(&url)
            .set("Accept", "application/json")
            .set("User-Agent", &self.user_agent)
            .timeout(self.timeout)
            .call()
        {
            Ok(response) => Self::parse_records(response),
            Err(ureq::Error::Status(400, _)) => Err(MarqError::InvalidIndex { index }),
            Err(ureq::Error::Status(status, response)) => {
                Err(Self::status_error(status, response))
            }
            Err(ureq::Error::Transport(e)) => Err(MarqError::StoreTransport(e.to_string())),
        }
    }
}

/// In-memory store with the same semantics, used by wizard and command
/// tests. Stamps `saved_at` locally on append.
#[derive(Debug, Default)]
pub struct MemoryGradeStore {
    records: RefCell<Vec<GradeRecord>>,
}

impl MemoryGradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<GradeRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }
}

impl GradeStore for MemoryGradeStore {
    fn list(&self) -> Result<Vec<GradeRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn append(&self, record: &GradeRecord) -> Result<Vec<GradeRecord>> {
        let mut stamped = record.clone();
        stamped.saved_at = Some(Utc::now());
        let mut records = self.records.borrow_mut();
        records.push(stamped);
        Ok(records.clone())
    }

    fn delete_at(&self, index: usize) -> Result<Vec<GradeRecord>> {
        let mut records = self.records.borrow_mut();
        if index >= records.len() {
            return Err(MarqError::InvalidIndex { index });
        }
        records.remove(index);
        Ok(records.clone())
    }
}
