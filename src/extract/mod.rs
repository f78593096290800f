//! Paginated extraction from a remote record source
//!
//! The source is abstracted behind the [`RecordSource`] trait ("fetch one page
//! of records at an offset"); [`Extractor`] drives the pagination loop and
//! assembles the full [`Dataset`]. The HTTP implementation lives in
//! [`soda`](self::soda) behind the `http-source` feature.

#[cfg(feature = "http-source")]
pub mod soda;

#[cfg(feature = "http-source")]
pub use soda::SodaClient;

use tracing::info;

use crate::models::{Dataset, Record};

/// Error type for source transport failures
///
/// Any of these aborts the entire extraction; partial data is never returned.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request could not be sent or completed
    #[error("Request failed: {0}")]
    Request(String),

    /// Source answered with a non-success HTTP status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body was not parseable as a record list
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// Source endpoint is not usable
    #[error("Invalid source endpoint: {0}")]
    Endpoint(String),
}

/// A paginated record source
///
/// One call fetches one bounded page. Implementations perform no retries;
/// a failed call fails the page.
pub trait RecordSource {
    /// Fetch a page of at most `limit` records starting at `offset`
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Record>, TransportError>;
}

/// Paginated extractor
///
/// Repeatedly fetches fixed-size pages until the source is exhausted or the
/// record cap is reached, concatenating results into one in-memory dataset.
pub struct Extractor<'a, S: RecordSource> {
    source: &'a S,
    page_size: usize,
    max_records: Option<usize>,
}

impl<'a, S: RecordSource> Extractor<'a, S> {
    /// Create an extractor over `source` fetching pages of `page_size`
    pub fn new(source: &'a S, page_size: usize) -> Self {
        Self {
            source,
            page_size,
            max_records: None,
        }
    }

    /// Cap the total number of records extracted
    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    /// Run the pagination loop and return the assembled dataset
    ///
    /// Termination conditions, checked each iteration in priority order:
    /// 1. Empty page received - no more data.
    /// 2. Record cap reached - accumulator truncated to exactly the cap.
    /// 3. Short page received - last page, skip the trailing empty-page call.
    ///
    /// A transport error aborts the extraction and propagates to the caller.
    pub fn extract(&self) -> Result<Dataset, TransportError> {
        let mut records: Vec<Record> = Vec::new();
        let mut offset = 0;

        info!(page_size = self.page_size, "Starting data extraction");

        loop {
            let page = self.source.fetch_page(self.page_size, offset)?;

            if page.is_empty() {
                break;
            }

            let fetched = page.len();
            records.extend(page);

            if let Some(max_records) = self.max_records
                && records.len() >= max_records
            {
                records.truncate(max_records);
                info!(max_records, "Reached max_records limit");
                break;
            }

            if fetched < self.page_size {
                break;
            }

            offset += self.page_size;
        }

        info!(total = records.len(), "Total records extracted");

        Ok(Dataset::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct PagedSource {
        pages: Vec<Vec<Record>>,
        calls: Mutex<usize>,
    }

    impl PagedSource {
        fn new(sizes: &[usize]) -> Self {
            let pages = sizes
                .iter()
                .map(|&n| (0..n).map(|i| one_record(i as i64)).collect())
                .collect();
            Self {
                pages,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl RecordSource for PagedSource {
        fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Record>, TransportError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .pages
                .get(offset / limit)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn one_record(n: i64) -> Record {
        let mut record = Record::new();
        record.insert("n".to_string(), json!(n));
        record
    }

    #[test]
    fn stops_after_short_page_without_extra_call() {
        let source = PagedSource::new(&[10, 10, 4]);
        let dataset = Extractor::new(&source, 10).extract().unwrap();

        assert_eq!(dataset.row_count(), 24);
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn truncates_to_record_cap() {
        let source = PagedSource::new(&[10, 10, 10]);
        let dataset = Extractor::new(&source, 10)
            .with_max_records(Some(15))
            .extract()
            .unwrap();

        assert_eq!(dataset.row_count(), 15);
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn empty_first_page_yields_empty_dataset() {
        let source = PagedSource::new(&[]);
        let dataset = Extractor::new(&source, 10).extract().unwrap();

        assert!(dataset.is_empty());
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn transport_error_propagates() {
        struct FailingSource;

        impl RecordSource for FailingSource {
            fn fetch_page(&self, _: usize, _: usize) -> Result<Vec<Record>, TransportError> {
                Err(TransportError::Request("connection reset".to_string()))
            }
        }

        let result = Extractor::new(&FailingSource, 10).extract();
        assert!(matches!(result, Err(TransportError::Request(_))));
    }
}
