//! Integration tests for the paginated extractor

use serde_json::json;
use std::sync::Mutex;

use soda_ingest::extract::{Extractor, RecordSource, TransportError};
use soda_ingest::models::Record;

/// Source serving a fixed sequence of pages, counting calls
struct PagedSource {
    pages: Vec<Vec<Record>>,
    calls: Mutex<usize>,
}

impl PagedSource {
    fn with_page_sizes(sizes: &[usize]) -> Self {
        let mut next_id = 0i64;
        let pages = sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        next_id += 1;
                        let mut record = Record::new();
                        record.insert("id".to_string(), json!(next_id));
                        record.insert("topic".to_string(), json!("Mental Health"));
                        record
                    })
                    .collect()
            })
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

#[test]
fn three_pages_ending_short_extract_all_rows_in_three_calls() {
    let source = PagedSource::with_page_sizes(&[10_000, 10_000, 4_000]);

    let dataset = Extractor::new(&source, 10_000).extract().unwrap();

    assert_eq!(dataset.row_count(), 24_000);
    assert_eq!(source.calls(), 3);
}

#[test]
fn accumulated_size_equals_sum_of_pages_received() {
    for sizes in [&[7usize, 7, 3][..], &[5, 5, 5, 2][..], &[1][..]] {
        let source = PagedSource::with_page_sizes(sizes);
        let page_size = sizes[0];

        let dataset = Extractor::new(&source, page_size).extract().unwrap();

        assert_eq!(dataset.row_count(), sizes.iter().sum::<usize>());
    }
}

#[test]
fn record_cap_returns_exactly_max_records_when_source_has_more() {
    let source = PagedSource::with_page_sizes(&[100, 100, 100, 100]);

    let dataset = Extractor::new(&source, 100)
        .with_max_records(Some(250))
        .extract()
        .unwrap();

    assert_eq!(dataset.row_count(), 250);
}

#[test]
fn record_cap_above_supply_returns_full_source() {
    let source = PagedSource::with_page_sizes(&[100, 40]);

    let dataset = Extractor::new(&source, 100)
        .with_max_records(Some(10_000))
        .extract()
        .unwrap();

    assert_eq!(dataset.row_count(), 140);
}

#[test]
fn empty_source_returns_empty_dataset_after_one_call() {
    let source = PagedSource::with_page_sizes(&[]);

    let dataset = Extractor::new(&source, 100).extract().unwrap();

    assert!(dataset.is_empty());
    assert_eq!(source.calls(), 1);
}

#[test]
fn transport_failure_aborts_without_partial_data() {
    struct FailOnSecondPage {
        calls: Mutex<usize>,
    }

    impl RecordSource for FailOnSecondPage {
        fn fetch_page(&self, limit: usize, _offset: usize) -> Result<Vec<Record>, TransportError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls > 1 {
                return Err(TransportError::Status {
                    status: 503,
                    url: "https://example.org/resource/a.json".to_string(),
                });
            }
            Ok((0..limit)
                .map(|i| {
                    let mut record = Record::new();
                    record.insert("id".to_string(), json!(i));
                    record
                })
                .collect())
        }
    }

    let source = FailOnSecondPage {
        calls: Mutex::new(0),
    };
    let result = Extractor::new(&source, 50).extract();

    assert!(matches!(
        result,
        Err(TransportError::Status { status: 503, .. })
    ));
}
