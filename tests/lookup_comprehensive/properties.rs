//! Property Tests
//!
//! - Key and identity lookups of one compilation return the same content
//! - Omitting the target is the same as asking for `FetchTarget::Main`
//! - A target the compilation did not produce is absent, never an error
//! - Keys that were never inserted are not found

use super::*;
use kiln::{FetchTarget, LookupExt, ProgramKey};
use proptest::prelude::*;

fn target_strategy() -> impl Strategy<Value = FetchTarget> {
    prop_oneof![
        Just(FetchTarget::Main),
        Just(FetchTarget::Sharding),
        Just(FetchTarget::Unsharding),
    ]
}

/// (tag, has_sharding, has_unsharding) per partition
fn partitions_strategy() -> impl Strategy<Value = Vec<(u8, bool, bool)>> {
    prop::collection::vec((any::<u8>(), any::<bool>(), any::<bool>()), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn key_and_identity_lookups_agree(
        uid in any::<u64>(),
        partitions in partitions_strategy(),
        target in target_strategy(),
    ) {
        let cache = Arc::new(ProgramCache::new());
        let programs = partitions
            .iter()
            .map(|(tag, s, u)| program(*tag, *s, *u))
            .collect();
        let keys = cache.insert_partitions("prop", uid, programs).unwrap();

        for (_, lookup) in both_topologies(&cache) {
            for (partition, key) in keys.iter().enumerate() {
                let by_key = lookup.lookup_key_target(key, target).unwrap();
                let by_id = lookup.lookup_uid_target(uid, partition as u32, target).unwrap();
                prop_assert_eq!(by_key.executable(), by_id.executable());
                prop_assert_eq!(by_key.program(), by_id.program());
            }
        }
    }

    #[test]
    fn omitted_target_is_main(
        partitions in partitions_strategy(),
    ) {
        let cache = Arc::new(ProgramCache::new());
        let programs = partitions
            .iter()
            .map(|(tag, s, u)| program(*tag, *s, *u))
            .collect();
        let keys = cache.insert_partitions("main", 1, programs).unwrap();

        for (_, lookup) in both_topologies(&cache) {
            for (partition, key) in keys.iter().enumerate() {
                let implicit = lookup.lookup_key(key).unwrap();
                let explicit = lookup.lookup_key_target(key, FetchTarget::Main).unwrap();
                prop_assert_eq!(implicit.target(), FetchTarget::Main);
                prop_assert_eq!(implicit.executable(), explicit.executable());

                let implicit = lookup.lookup_uid(1, partition as u32).unwrap();
                prop_assert!(implicit.executable().is_some());
            }
        }
    }

    #[test]
    fn unproduced_target_is_absent_not_error(
        tag in any::<u8>(),
        has_sharding in any::<bool>(),
        has_unsharding in any::<bool>(),
    ) {
        let cache = Arc::new(ProgramCache::new());
        cache
            .insert_partitions("absent", 9, vec![program(tag, has_sharding, has_unsharding)])
            .unwrap();

        for (_, lookup) in both_topologies(&cache) {
            let sharding = lookup.lookup_uid_target(9, 0, FetchTarget::Sharding).unwrap();
            let unsharding = lookup.lookup_uid_target(9, 0, FetchTarget::Unsharding).unwrap();
            prop_assert_eq!(sharding.executable().is_some(), has_sharding);
            prop_assert_eq!(unsharding.executable().is_some(), has_unsharding);
        }
    }

    #[test]
    fn never_inserted_keys_are_not_found(
        missing in "[a-z]{1,12}",
    ) {
        let cache = Arc::new(ProgramCache::new());
        cache.insert_partitions("present", 1, vec![program(1, false, false)]).unwrap();
        let key = ProgramKey::new(missing).unwrap();

        for (_, lookup) in both_topologies(&cache) {
            let err = lookup.lookup_key(&key).unwrap_err();
            prop_assert!(err.is_not_found());
        }
    }
}
