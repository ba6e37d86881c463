// Integration tests for the level table as seen by the match finder.
//
// Covers:
//   - every level's parameters drive a finder that reports genuine matches
//   - enhanced (5-byte) hashing ignores 4-byte-only repeats
//   - deeper levels find matches at least as long as shallow ones

use lz4chain::block::{search_params, CompressionLevel, MatchVariant};
use lz4chain::caps::Capabilities;
use lz4chain::matcher::{MatchFinder, SearchParams};

fn finder_for(level: u32, variant: MatchVariant) -> MatchFinder<'static> {
    let params = search_params(CompressionLevel::new(level).unwrap(), variant);
    MatchFinder::new(params, Capabilities::detect().byte_compare())
}

fn sample(len: usize) -> Vec<u8> {
    let words: [&[u8]; 6] = [b"alpha ", b"beta ", b"gamma ", b"delta ", b"alphabet ", b"gammaray "];
    let mut out = Vec::with_capacity(len + 16);
    let mut i = 0u32;
    while out.len() < len {
        i = i.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
        out.extend_from_slice(words[(i >> 28) as usize % words.len()]);
    }
    out.truncate(len);
    out
}

#[test]
fn every_level_reports_genuine_matches() {
    let data = sample(6_000);
    for level in 1..=12 {
        for variant in [MatchVariant::Baseline, MatchVariant::Improved] {
            let mut mf = finder_for(level, variant);
            mf.reset(&data);
            let window = mf.params().window_size;
            for pos in (0..data.len()).step_by(7) {
                if let Some(m) = mf.find_best_match(pos) {
                    assert!(m.offset <= window && m.offset <= pos, "level {level}: {m:?}");
                    assert_eq!(
                        &data[pos - m.offset..pos - m.offset + m.length],
                        &data[pos..pos + m.length],
                        "level {level} at {pos}"
                    );
                }
            }
        }
    }
}

#[test]
fn enhanced_hash_skips_four_byte_repeats() {
    // "PQRS" repeats but the fifth byte differs.
    let data = b"_PQRSa______PQRSb__";
    let four = SearchParams::default();
    let five = SearchParams { enhanced_hash: true, ..SearchParams::default() };

    let mut mf = MatchFinder::new(four, Capabilities::scalar().byte_compare());
    mf.reset(data);
    let m = mf.find_best_match(12).expect("4-byte match");
    assert_eq!(m.length, 4);

    let mut mf = MatchFinder::new(five, Capabilities::scalar().byte_compare());
    mf.reset(data);
    assert!(mf.find_best_match(12).is_none());
}

#[test]
fn deeper_search_never_finds_shorter_matches() {
    let data = sample(20_000);
    let mut shallow = finder_for(4, MatchVariant::Improved);
    let mut deep = finder_for(6, MatchVariant::Improved);
    shallow.reset(&data);
    deep.reset(&data);
    for pos in 0..data.len() {
        let a = shallow.find_best_match(pos).map_or(0, |m| m.length);
        let b = deep.find_best_match(pos).map_or(0, |m| m.length);
        assert!(b >= a, "at {pos}: level 6 found {b}, level 4 found {a}");
    }
}

#[test]
fn fast_levels_have_narrow_window() {
    let params = search_params(CompressionLevel::new(1).unwrap(), MatchVariant::Improved);
    assert_eq!(params.window_size, 16 * 1024);
    assert_eq!(params.max_attempts, 1);
    assert!(!params.insert_covered);
}
