mod common;

use std::sync::Arc;

use revtail::{FilterSet, MatchAnySubstring};

use common::{numbered_lines, substring_filters, tail, write_fixture};

const CHUNK_SIZES: [usize; 6] = [1, 3, 17, 64, 4096, 1 << 20];

fn expected_reverse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|l| l.trim_end().to_string())
        .filter(|l| !l.is_empty())
        .rev()
        .collect()
}

#[test]
fn unbounded_scan_is_reverse_of_file_for_every_chunk_size() {
    let content = numbered_lines(500);
    let fx = write_fixture(&content);
    let want = expected_reverse(&content);
    for chunk_size in CHUNK_SIZES {
        let got = tail(&fx.path, 0, chunk_size, substring_filters(&[]));
        assert_eq!(got, want, "chunk_size={chunk_size}");
        let got = tail(&fx.path, 10_000, chunk_size, substring_filters(&[]));
        assert_eq!(got, want, "chunk_size={chunk_size}");
    }
}

#[test]
fn bounded_scan_is_prefix_of_unbounded() {
    let content = numbered_lines(300);
    let fx = write_fixture(&content);
    let all = tail(&fx.path, -1, 64, substring_filters(&[]));
    for n in [1usize, 2, 7, 150, 299, 300, 301] {
        let got = tail(&fx.path, n as i64, 64, substring_filters(&[]));
        assert_eq!(got.len(), n.min(all.len()));
        assert_eq!(got[..], all[..got.len()], "n={n}");
    }
}

#[test]
fn repeated_scans_are_identical() {
    let content = numbered_lines(200);
    let fx = write_fixture(&content);
    let first = tail(&fx.path, 50, 32, substring_filters(&["1"]));
    for _ in 0..3 {
        assert_eq!(tail(&fx.path, 50, 32, substring_filters(&["1"])), first);
    }
}

#[test]
fn filtering_is_order_independent_and_deduplicated() {
    let content = numbered_lines(400);
    let fx = write_fixture(&content);
    let ab = tail(&fx.path, 0, 64, substring_filters(&["7", "xxxx"]));
    let ba = tail(&fx.path, 0, 64, substring_filters(&["xxxx", "7"]));
    assert_eq!(ab, ba);

    let two_filters = Arc::new(
        FilterSet::new()
            .with_filter(MatchAnySubstring::new(["7"]))
            .with_filter(MatchAnySubstring::new(["xxxx"])),
    );
    assert_eq!(tail(&fx.path, 0, 64, two_filters), ab);

    let want: Vec<String> = expected_reverse(&content)
        .into_iter()
        .filter(|l| l.contains('7') || l.contains("xxxx"))
        .collect();
    assert_eq!(ab, want);
}

#[test]
fn trailing_newline_does_not_add_a_line() {
    let fx = write_fixture("a\nb\nc\n");
    for chunk_size in CHUNK_SIZES {
        assert_eq!(
            tail(&fx.path, 0, chunk_size, substring_filters(&[])),
            vec!["c", "b", "a"],
            "chunk_size={chunk_size}"
        );
    }
}

#[test]
fn empty_file_yields_no_lines() {
    let fx = write_fixture("");
    assert!(tail(&fx.path, 0, 4096, substring_filters(&[])).is_empty());
}

#[test]
fn long_lines_span_many_chunks() {
    let long = "y".repeat(10_000);
    let content = format!("short\n{long}\nend");
    let fx = write_fixture(&content);
    let got = tail(&fx.path, 0, 7, substring_filters(&[]));
    assert_eq!(got, vec!["end".to_string(), long, "short".to_string()]);
}
