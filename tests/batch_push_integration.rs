use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Mutex;

use opush::TransferError;
use opush::remote::{ObjectStore, push_batch};
use opush::task_list::Pair;

// In-memory store in the spirit of the transport client: records every put
// and can be told to fail specific keys.
struct MockStore {
    puts: Mutex<Vec<(String, u64)>>,
    fail_keys: HashSet<String>,
}

impl MockStore {
    fn new() -> Self {
        Self { puts: Mutex::new(Vec::new()), fail_keys: HashSet::new() }
    }

    fn failing(keys: impl IntoIterator<Item = String>) -> Self {
        Self { puts: Mutex::new(Vec::new()), fail_keys: keys.into_iter().collect() }
    }

    fn put_keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl ObjectStore for MockStore {
    fn put(
        &self,
        key: &str,
        body: &mut dyn Read,
        _content_type: &str,
    ) -> Result<(), TransferError> {
        if self.fail_keys.contains(key) {
            return Err(TransferError::Upload(key.to_string(), "simulated transport failure".into()));
        }
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)
            .map_err(|e| TransferError::Upload(key.to_string(), e.to_string()))?;
        self.puts.lock().unwrap().push((key.to_string(), buf.len() as u64));
        Ok(())
    }
}

fn make_pairs(dir: &std::path::Path, count: usize) -> Vec<Pair> {
    (0..count)
        .map(|i| {
            let local = dir.join(format!("f{:03}.bin", i));
            fs::write(&local, b"payload!").unwrap();
            Pair { local, key: format!("data/f{:03}.bin", i) }
        })
        .collect()
}

#[test]
fn every_pair_reaches_exactly_one_terminal_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pairs = make_pairs(dir.path(), 20);
    for concurrency in [1usize, 3, 20, 64] {
        let store = MockStore::new();
        let report = push_batch(&store, &pairs, concurrency);
        assert_eq!(report.attempted(), 20, "concurrency {}", concurrency);
        assert_eq!(report.succeeded, 20);
        assert!(report.skipped.is_empty() && report.failed.is_empty());
        // no pair delivered to two workers
        let keys = store.put_keys();
        assert_eq!(keys.len(), 20);
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), 20);
    }
}

#[test]
fn transport_failures_are_isolated_per_pair() {
    // 100 pairs, concurrency 10, transport fails for 5 specific keys
    let dir = tempfile::tempdir().expect("tempdir");
    let pairs = make_pairs(dir.path(), 100);
    let bad: Vec<String> = [3usize, 17, 42, 63, 99]
        .iter()
        .map(|i| format!("data/f{:03}.bin", i))
        .collect();
    let store = MockStore::failing(bad.clone());

    let report = push_batch(&store, &pairs, 10);
    assert_eq!(report.succeeded, 95);
    assert_eq!(report.failed.len(), 5);
    assert!(report.skipped.is_empty());
    assert_eq!(report.failure_count(), 5);

    let mut failed_keys: Vec<String> =
        report.failed.iter().map(|(pair, _)| pair.key.clone()).collect();
    failed_keys.sort();
    let mut expected = bad;
    expected.sort();
    assert_eq!(failed_keys, expected);
    for (_, err) in &report.failed {
        assert!(matches!(err, TransferError::Upload(_, _)));
    }
}

#[test]
fn empty_and_missing_files_are_skipped_not_failed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let full = dir.path().join("x.txt");
    fs::write(&full, b"0123456789").unwrap();
    let empty = dir.path().join("y.txt");
    fs::write(&empty, b"").unwrap();

    let pairs = vec![
        Pair { local: full, key: "prefix/x.txt".into() },
        Pair { local: empty, key: "prefix/y.txt".into() },
        Pair { local: PathBuf::from(dir.path().join("gone.txt")), key: "prefix/gone.txt".into() },
    ];
    let store = MockStore::new();
    let report = push_batch(&store, &pairs, 2);

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.failed.is_empty());
    assert_eq!(store.put_keys(), vec!["prefix/x.txt".to_string()]);

    let kinds: HashSet<&'static str> =
        report.skipped.iter().map(|(_, err)| err.kind()).collect();
    assert_eq!(kinds, HashSet::from(["empty_file", "not_found"]));
    // skips still mark the batch as not clean
    assert!(!report.is_clean());
}

#[test]
fn byte_totals_cover_succeeded_pairs_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pairs = make_pairs(dir.path(), 10); // 8 bytes each
    let store = MockStore::failing(vec!["data/f000.bin".to_string()]);
    let report = push_batch(&store, &pairs, 4);
    assert_eq!(report.succeeded, 9);
    assert_eq!(report.bytes, 9 * 8);
}

#[test]
fn repeat_push_yields_identical_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pairs = make_pairs(dir.path(), 12);
    let store = MockStore::failing(vec!["data/f005.bin".to_string()]);

    let first = push_batch(&store, &pairs, 3);
    let second = push_batch(&store, &pairs, 3);
    assert_eq!(first.succeeded, second.succeeded);
    assert_eq!(first.skipped.len(), second.skipped.len());
    assert_eq!(first.failed.len(), second.failed.len());
}

// Store that drains its body in tiny reads and records how many it took.
struct ChunkReadingStore {
    reads: Mutex<Vec<usize>>,
    content: Mutex<Vec<u8>>,
}

impl ObjectStore for ChunkReadingStore {
    fn put(
        &self,
        key: &str,
        body: &mut dyn Read,
        _content_type: &str,
    ) -> Result<(), TransferError> {
        let mut reads = 0usize;
        let mut all = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = body
                .read(&mut buf)
                .map_err(|e| TransferError::Upload(key.to_string(), e.to_string()))?;
            if n == 0 {
                break;
            }
            reads += 1;
            all.extend_from_slice(&buf[..n]);
        }
        self.reads.lock().unwrap().push(reads);
        self.content.lock().unwrap().extend_from_slice(&all);
        Ok(())
    }
}

#[test]
fn store_consumes_the_body_incrementally() {
    // The engine must hand the store the open file itself, not a
    // pre-buffered copy, so transports can stream without holding whole
    // files in memory.
    let dir = tempfile::tempdir().expect("tempdir");
    let local = dir.path().join("big.bin");
    fs::write(&local, b"0123456789").unwrap();
    let pairs = vec![Pair { local, key: "data/big.bin".into() }];

    let store =
        ChunkReadingStore { reads: Mutex::new(Vec::new()), content: Mutex::new(Vec::new()) };
    let report = push_batch(&store, &pairs, 1);

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.bytes, 10);
    assert_eq!(store.content.lock().unwrap().as_slice(), b"0123456789");
    // 10 bytes through a 3-byte buffer: the body arrived in pieces
    let reads = store.reads.lock().unwrap();
    assert_eq!(reads.len(), 1);
    assert!(reads[0] >= 4, "expected chunked reads, got {}", reads[0]);
}

#[test]
fn empty_batch_is_a_noop() {
    let store = MockStore::new();
    let report = push_batch(&store, &[], 8);
    assert_eq!(report.attempted(), 0);
    assert!(report.is_clean());
    assert!(store.put_keys().is_empty());
}
