use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use revtail::{FilterSet, LogSource, MemorySource, RawFileSource, TailError, TailOptions, scan};

/// Serves `data` but fails any read that starts below `fail_below`.
struct FailingSource {
    inner: MemorySource,
    fail_below: u64,
    rewound: Arc<AtomicBool>,
}

impl LogSource for FailingSource {
    fn len(&self) -> u64 {
        self.inner.len()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TailError> {
        if offset < self.fail_below {
            return Err(TailError::Io(std::io::Error::other("disk on fire")));
        }
        self.inner.read_at(offset, buf)
    }

    fn rewind(&self) -> Result<(), TailError> {
        self.rewound.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Reports a length longer than the data it holds.
struct ShrunkSource(MemorySource, u64);

impl LogSource for ShrunkSource {
    fn len(&self) -> u64 {
        self.1
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, TailError> {
        self.0.read_at(offset, buf)
    }
}

/// Panics on every read.
struct PanickingSource(MemorySource);

impl LogSource for PanickingSource {
    fn len(&self) -> u64 {
        self.0.len()
    }

    fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> Result<usize, TailError> {
        panic!("read_at exploded");
    }
}

#[test]
fn read_failure_delivers_partial_lines_then_one_error() {
    let rewound = Arc::new(AtomicBool::new(false));
    let source = FailingSource {
        inner: MemorySource::new("one\ntwo\nthree\nfour\n"),
        fail_below: 8,
        rewound: rewound.clone(),
    };
    let options = TailOptions::default().with_chunk_size(4);
    let stream = scan(source, &options, Arc::new(FilterSet::new()));

    let lines: Vec<String> = stream.lines().iter().collect();
    assert_eq!(lines, vec!["four"]);

    let err = stream.errors().recv().expect("terminal error");
    assert!(matches!(err, TailError::Io(_)));
    assert!(stream.errors().recv().is_err());
    assert!(rewound.load(Ordering::SeqCst));
}

#[test]
fn finish_reports_the_error() {
    let source = FailingSource {
        inner: MemorySource::new("a\nb\n"),
        fail_below: u64::MAX,
        rewound: Arc::new(AtomicBool::new(false)),
    };
    let stream = scan(source, &TailOptions::default(), Arc::new(FilterSet::new()));
    assert_eq!(stream.lines().iter().count(), 0);
    assert!(matches!(stream.finish(), Err(TailError::Io(_))));
}

#[test]
fn short_read_fails_closed() {
    let source = ShrunkSource(MemorySource::new("abc\ndef\n"), 12);
    let options = TailOptions::default().with_chunk_size(6);
    let stream = scan(source, &options, Arc::new(FilterSet::new()));
    assert_eq!(stream.lines().iter().count(), 0);
    let err = stream.finish().expect_err("short read");
    match err {
        TailError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_cursor_is_rewound_after_scan() {
    let mut file = tempfile::tempfile().expect("tempfile");
    file.write_all(b"alpha\nbeta\ngamma\n").expect("write");
    file.seek(SeekFrom::Start(11)).expect("seek");

    let source = RawFileSource::from_file(file.try_clone().expect("clone")).expect("source");
    let stream = scan(source, &TailOptions::default(), Arc::new(FilterSet::new()));
    let lines: Vec<String> = stream.lines().iter().collect();
    assert_eq!(lines, vec!["gamma", "beta", "alpha"]);
    stream.finish().expect("finish");

    let mut head = String::new();
    file.read_to_string(&mut head).expect("read");
    assert_eq!(head, "alpha\nbeta\ngamma\n");
}

#[test]
fn invalid_utf8_is_replaced_not_fatal() {
    let source = MemorySource::new(&b"ok\n\xff\xfebad\n"[..]);
    let stream = scan(source, &TailOptions::default(), Arc::new(FilterSet::new()));
    let lines: Vec<String> = stream.lines().iter().collect();
    assert_eq!(lines, vec!["\u{fffd}\u{fffd}bad", "ok"]);
    stream.finish().expect("finish");
}

#[test]
fn chunk_size_larger_than_memory_reads_small_file_once() {
    let options = TailOptions::default().with_chunk_size(usize::MAX);
    let stream = scan(MemorySource::new("a\nb\n"), &options, Arc::new(FilterSet::new()));
    let lines: Vec<String> = stream.lines().iter().collect();
    assert_eq!(lines, vec!["b", "a"]);
    assert!(stream.errors().recv().is_err());
    let stats = stream.finish().expect("finish");
    assert_eq!(stats.chunks_read, 1);
}

#[test]
fn producer_panic_is_reported_on_error_channel() {
    let source = PanickingSource(MemorySource::new("a\nb\n"));
    let stream = scan(source, &TailOptions::default(), Arc::new(FilterSet::new()));
    assert_eq!(stream.lines().iter().count(), 0);

    match stream.errors().recv().expect("terminal error") {
        TailError::MalformedState(msg) => assert!(msg.contains("read_at exploded"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(stream.errors().recv().is_err());
    assert!(matches!(stream.finish(), Err(TailError::MalformedState(_))));
}

#[test]
fn finish_after_draining_error_returns_the_same_error() {
    let source = FailingSource {
        inner: MemorySource::new("a\nb\n"),
        fail_below: u64::MAX,
        rewound: Arc::new(AtomicBool::new(false)),
    };
    let stream = scan(source, &TailOptions::default(), Arc::new(FilterSet::new()));
    assert_eq!(stream.lines().iter().count(), 0);

    let delivered = match stream.errors().recv().expect("terminal error") {
        TailError::Io(io) => io,
        other => panic!("unexpected error: {other}"),
    };
    match stream.finish() {
        Err(TailError::Io(io)) => {
            assert_eq!(io.kind(), delivered.kind());
            assert_eq!(io.to_string(), "disk on fire");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
