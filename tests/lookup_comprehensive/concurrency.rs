//! Lookup Concurrency Tests
//!
//! Multiple execution threads share one lookup instance:
//! - Concurrent lookups of one key return equivalent content
//! - Pins return to zero once every thread is done
//! - Lookups racing evictions either succeed fully or fail with NotFound

use super::*;
use kiln::{FetchTarget, LookupExt, ProgramIdentity, ProgramKey};
use parking_lot::Mutex;
use std::sync::Barrier;
use std::thread;

const NUM_THREADS: usize = 8;
const LOOKUPS_PER_THREAD: usize = 250;

#[test]
fn test_concurrent_lookups_same_key() {
    let cache = Arc::new(ProgramCache::new());
    let hot = ProgramKey::new("hot").unwrap();
    cache
        .insert(hot.clone(), ProgramIdentity::new(1, 0), program(77, true, false))
        .unwrap();

    for (name, lookup) in both_topologies(&cache) {
        let barrier = Arc::new(Barrier::new(NUM_THREADS));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..NUM_THREADS)
            .map(|i| {
                let lookup = Arc::clone(&lookup);
                let barrier = Arc::clone(&barrier);
                let seen = Arc::clone(&seen);
                let hot = hot.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..LOOKUPS_PER_THREAD {
                        let entry = if i % 2 == 0 {
                            lookup.lookup_key(&hot).unwrap()
                        } else {
                            lookup.lookup_uid(1, 0).unwrap()
                        };
                        let bytes = entry.executable().unwrap().bytes().to_vec();
                        assert!(bytes.iter().all(|b| *b == 77));
                        seen.lock().push(bytes);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), NUM_THREADS * LOOKUPS_PER_THREAD, "{}", name);
        assert!(seen.windows(2).all(|w| w[0] == w[1]), "{}", name);
        assert_eq!(cache.pinned(&hot), Some(0), "{}", name);
    }
}

#[test]
fn test_lookups_racing_eviction() {
    let cache = Arc::new(ProgramCache::new());
    let lookup: Arc<dyn ProgramLookup> = Arc::new(LocalLookup::new(&cache));
    let churn = ProgramKey::new("churn").unwrap();
    let rounds: u64 = 300;
    let barrier = Arc::new(Barrier::new(NUM_THREADS + 1));

    let writer = {
        let cache = Arc::clone(&cache);
        let barrier = Arc::clone(&barrier);
        let churn = churn.clone();
        thread::spawn(move || {
            barrier.wait();
            for round in 0..rounds {
                let tag = (round % 200) as u8;
                cache
                    .insert(churn.clone(), ProgramIdentity::new(round, 0), program(tag, true, true))
                    .unwrap();
                cache.evict(&churn);
            }
        })
    };

    let readers: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let lookup = Arc::clone(&lookup);
            let barrier = Arc::clone(&barrier);
            let churn = churn.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..LOOKUPS_PER_THREAD {
                    match lookup.lookup_key_target(&churn, FetchTarget::Unsharding) {
                        Ok(entry) => {
                            let main = entry.program().main().bytes()[0];
                            let exe = entry.executable().unwrap();
                            assert!(exe.bytes().iter().all(|b| *b == main));
                        }
                        Err(e) => assert!(e.is_not_found(), "unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert!(cache.is_empty());
}
