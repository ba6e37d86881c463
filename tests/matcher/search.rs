// Integration tests for src/matcher/search.rs — hash-chain match finder.
//
// Covers:
//   - reset semantics and reuse across inputs
//   - match validity: every reported match really repeats earlier bytes
//   - window, attempt and good-enough limits
//   - lazy evaluation
//   - chain ordering

use lz4chain::block::{MAX_DISTANCE, MINMATCH};
use lz4chain::caps::Capabilities;
use lz4chain::matcher::{LazyDecision, MatchCandidate, MatchFinder, SearchParams};

fn finder(params: SearchParams) -> MatchFinder<'static> {
    MatchFinder::new(params, Capabilities::scalar().byte_compare())
}

fn pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            b"abcdefgh"[(x >> 16) as usize % 8]
        })
        .collect()
}

fn assert_valid(data: &[u8], pos: usize, m: MatchCandidate, window: usize) {
    assert!(m.length >= MINMATCH, "short match {m:?} at {pos}");
    assert!(m.offset >= 1 && m.offset <= pos && m.offset <= window, "bad offset {m:?} at {pos}");
    assert!(pos + m.length <= data.len());
    let src = pos - m.offset;
    for i in 0..m.length {
        assert_eq!(data[src + i], data[pos + i], "mismatch in {m:?} at {pos}+{i}");
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn cursor_advances_and_clamps() {
    let data = b"0123456789abcdef";
    let mut mf = finder(SearchParams::default());
    mf.reset(data);
    assert_eq!(mf.position(), 0);
    mf.advance(10);
    assert_eq!(mf.position(), 10);
    assert!(!mf.at_end());
    mf.advance(100);
    assert_eq!(mf.position(), data.len());
    assert!(mf.at_end());
}

#[test]
fn reset_forgets_previous_input() {
    let first = b"_QRSTUVWX_______QRSTUVWX".to_vec();
    let second = b"abcdefghijklmnopqrstuvwx".to_vec();
    let mut mf = MatchFinder::new(SearchParams::default(), Capabilities::scalar().byte_compare());
    mf.reset(&first);
    assert!(mf.find_best_match(16).is_some());

    mf.reset(&second);
    for pos in 0..second.len() {
        assert!(mf.find_best_match(pos).is_none(), "stale match at {pos}");
    }
}

#[test]
fn no_match_in_last_three_bytes() {
    let data = vec![b'a'; 32];
    let mut mf = finder(SearchParams::default());
    mf.reset(&data);
    assert!(mf.find_best_match(29).is_none());
    assert!(mf.find_best_match(28).is_some());
}

// ═════════════════════════════════════════════════════════════════════════════
// Validity
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn every_reported_match_is_genuine() {
    let data = pattern(8_000, 42);
    for params in [
        SearchParams::default(),
        SearchParams { enhanced_hash: true, hash_log: 12, ..SearchParams::default() },
        SearchParams { window_size: 300, max_attempts: 4, ..SearchParams::default() },
    ] {
        let mut mf = finder(params);
        mf.reset(&data);
        for pos in 0..data.len() {
            if let Some(m) = mf.find_best_match(pos) {
                assert_valid(&data, pos, m, params.window_size);
            }
        }
    }
}

#[test]
fn prefers_longest_candidate() {
    // "WXYZ" occurs twice; only the first occurrence continues with "1234".
    let data = b"_WXYZ1234__WXYZ00000WXYZ1234!";
    let mut mf = finder(SearchParams::default());
    mf.reset(data);
    let m = mf.find_best_match(20).expect("match");
    assert_eq!(m, MatchCandidate { offset: 19, length: 8 });
}

#[test]
fn ties_go_to_nearest() {
    let data = b"_WXYZ____WXYZ____WXYZ";
    let mut mf = finder(SearchParams::default());
    mf.reset(data);
    let m = mf.find_best_match(17).expect("match");
    assert_eq!(m.offset, 8);
}

#[test]
fn match_length_capped_at_maximum() {
    let data = vec![b'z'; 70_000];
    let mut mf = finder(SearchParams::default());
    mf.reset(&data);
    // position 0 is never a source, so the first match starts at 2
    let m = mf.find_best_match(2).expect("run");
    assert_eq!(m.offset, 1);
    assert_eq!(m.length, 65_535);
}

// ═════════════════════════════════════════════════════════════════════════════
// Limits
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn full_window_reaches_maximum_distance() {
    let mut data = vec![0u8; MAX_DISTANCE + 16];
    for (i, b) in data.iter_mut().enumerate() {
        *b = (i as u32).wrapping_mul(2_654_435_761).to_be_bytes()[0] | 1;
    }
    data[1..9].copy_from_slice(b"NEEDLE!!");
    let pos = 1 + MAX_DISTANCE;
    data[pos..pos + 8].copy_from_slice(b"NEEDLE!!");

    let mut mf = finder(SearchParams { max_attempts: 1 << 16, ..SearchParams::default() });
    mf.reset(&data);
    let m = mf.find_best_match(pos).expect("match at maximum distance");
    assert_eq!(m.offset, MAX_DISTANCE);
    assert!(m.length >= 8);
}

#[test]
fn single_attempt_sees_only_bucket_head() {
    // Newest candidate "KLMN" + "x" is shorter than the older "KLMN" + "opq".
    let data = b"_KLMNopq__KLMNx__KLMNopq_";
    let mut mf = finder(SearchParams { max_attempts: 1, ..SearchParams::default() });
    mf.reset(data);
    for pos in 0..17 {
        let _ = mf.find_best_match(pos);
    }
    let m = mf.find_best_match(17).expect("match");
    assert_eq!(m.offset, 7);
    assert_eq!(m.length, 4);
}

#[test]
fn good_enough_stops_the_walk() {
    let data = b"_KLMNopq__KLMNx__KLMNopq_";
    let mut mf = finder(SearchParams { good_enough: 4, ..SearchParams::default() });
    mf.reset(data);
    let m = mf.find_best_match(17).expect("match");
    assert_eq!(m.offset, 7);

    let mut full = finder(SearchParams::default());
    full.reset(data);
    assert_eq!(full.find_best_match(17).expect("match").offset, 16);
}

// ═════════════════════════════════════════════════════════════════════════════
// Lazy evaluation and chains
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn long_matches_are_kept_without_probing() {
    let data = vec![b'r'; 200];
    let mut mf = finder(SearchParams::default());
    mf.reset(&data);
    mf.advance(2);
    let current = mf.find_best_match(2).expect("run");
    assert_eq!(mf.lazy_match(current), LazyDecision::Keep);
}

#[test]
fn bucket_head_is_most_recent_insert() {
    let data = b"abcdXabcdYabcdZ";
    let mut mf = finder(SearchParams::default());
    mf.reset(data);
    for pos in 0..10 {
        let _ = mf.find_best_match(pos);
    }
    assert_eq!(mf.bucket_head(10), Some(5));
    assert_eq!(mf.previous(5), None);
}
