//! E2E suite: parallel block compression
//!
//! Runs `ParallelCompressor` against inputs large enough to fan out:
//! - determinism across worker counts, restarts and the synchronous path
//! - mixed compressible / incompressible regions around chunk edges
//! - a long-lived dispatcher serving many calls from several threads

use std::sync::Arc;
use std::thread;

use lz4chain::block::{KB, MB};
use lz4chain::{decompress_block, DispatcherConfig, ParallelCompressor};

fn mixed(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut x = 0x2545_F491u32;
    let mut region = 0usize;
    while out.len() < len {
        let take = (len - out.len()).min(37 * KB + region * 113);
        if region % 3 == 2 {
            // incompressible stretch
            for _ in 0..take {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                out.push(x as u8);
            }
        } else {
            let line = format!("region {region}: the same sentence, over and over again. ");
            out.extend(line.bytes().cycle().take(take));
        }
        region += 1;
    }
    out
}

#[test]
fn deterministic_across_workers_and_restarts() {
    let input = mixed(3 * MB);
    let reference = ParallelCompressor::new(DispatcherConfig::new(1, 256 * KB))
        .unwrap()
        .compress(&input, 3)
        .unwrap();
    assert_eq!(decompress_block(&reference, input.len()).unwrap(), input);

    for workers in [1, 3, 8] {
        let pc = ParallelCompressor::new(DispatcherConfig::new(workers, 256 * KB)).unwrap();
        for _ in 0..2 {
            pc.start();
            assert_eq!(pc.compress(&input, 3).unwrap(), reference, "{workers} workers");
            pc.stop();
        }
    }
}

#[test]
fn chunk_size_changes_stream_but_not_content() {
    let input = mixed(MB + 5);
    let mut sizes = Vec::new();
    for chunk in [16, 4 * KB, 64 * KB, 512 * KB] {
        let pc = ParallelCompressor::new(DispatcherConfig::new(4, chunk)).unwrap();
        pc.start();
        let packed = pc.compress(&input, 1).unwrap();
        assert_eq!(decompress_block(&packed, input.len()).unwrap(), input, "chunk {chunk}");
        sizes.push(packed.len());
    }
    // tiny chunks lose most matches
    assert!(sizes[0] > sizes[3]);
}

#[test]
fn shared_dispatcher_many_callers() {
    let pc = Arc::new(ParallelCompressor::new(DispatcherConfig::new(4, 64 * KB)).unwrap());
    pc.start();
    let workers: Vec<_> = (0..6)
        .map(|t| {
            let pc = Arc::clone(&pc);
            thread::spawn(move || {
                for round in 0..3 {
                    let input = mixed(200 * KB + t * 1000 + round);
                    let packed = pc.compress(&input, 1 + (t as u32 + round as u32) % 9).unwrap();
                    assert_eq!(decompress_block(&packed, input.len()).unwrap(), input);
                }
            })
        })
        .collect();
    for w in workers {
        w.join().unwrap();
    }
}

#[test]
fn stop_while_idle_then_compress_synchronously() {
    let input = mixed(700 * KB);
    let pc = ParallelCompressor::new(DispatcherConfig::new(4, 100 * KB)).unwrap();
    pc.start();
    let parallel = pc.compress(&input, 7).unwrap();
    pc.stop();
    assert!(!pc.is_running());
    assert_eq!(pc.compress(&input, 7).unwrap(), parallel);
}
