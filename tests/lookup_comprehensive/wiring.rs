//! Config -> Registry -> ExecutionContext Tests

use super::*;
use kiln::{
    ExecutionContext, FetchTarget, KilnError, LookupConfig, LookupRegistry, ProgramKey, Topology,
    COMPILATION_CACHE_LOOKUP, CONFIG_FILE_NAME,
};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> LookupConfig {
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, content).unwrap();
    LookupConfig::from_file(&path).unwrap()
}

fn cache_with_partitions() -> Arc<ProgramCache> {
    let cache = Arc::new(ProgramCache::new());
    cache
        .insert_partitions("graph", 7, vec![program(0, true, true), program(1, false, false)])
        .unwrap();
    cache
}

#[test]
fn test_local_config_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, LookupConfig::default_toml());
    assert_eq!(config.topology().unwrap(), Topology::Local);

    let cache = cache_with_partitions();
    let registry = LookupRegistry::new();
    registry.install_local(&config, &cache).unwrap();

    let ctx = ExecutionContext::from_registry(&registry, COMPILATION_CACHE_LOOKUP).unwrap();
    let len = ctx
        .with_partition(7, 0, FetchTarget::Sharding, |exe| {
            Ok(exe.map(|e| e.len()).unwrap_or(0))
        })
        .unwrap();
    assert_eq!(len, 16);
    assert_eq!(cache.outstanding_leases(), 0);
}

#[test]
fn test_remote_config_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "topology = \"remote\"\nresource_name = \"peer-lookup\"\n[remote]\nmax_response_bytes = 65536\n",
    );

    let cache = cache_with_partitions();
    let service = Arc::new(LookupService::new(cache.clone()));
    let registry = LookupRegistry::new();
    registry
        .install_remote(&config, LoopbackTransport::new(service))
        .unwrap();

    let ctx = ExecutionContext::from_registry(&registry, "peer-lookup").unwrap();
    let key = ProgramKey::for_partition("graph", 1).unwrap();
    let present = ctx
        .with_program(&key, FetchTarget::Unsharding, |exe| Ok(exe.is_some()))
        .unwrap();
    assert!(!present);
    assert!(ctx.lookup().debug_string().contains("hits=1"));
}

#[test]
fn test_operation_error_propagates_and_releases() {
    let cache = cache_with_partitions();
    let registry = LookupRegistry::new();
    registry
        .install_local(&LookupConfig::default(), &cache)
        .unwrap();
    let ctx = ExecutionContext::from_registry(&registry, COMPILATION_CACHE_LOOKUP).unwrap();

    let result: Result<(), KilnError> = ctx.with_partition(7, 1, FetchTarget::Main, |_| {
        Err(KilnError::internal("device lost"))
    });
    assert!(matches!(result, Err(KilnError::Internal { .. })));
    assert_eq!(cache.outstanding_leases(), 0);
}

#[test]
fn test_bad_topology_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "topology = \"hybrid\"\n").unwrap();
    let err = LookupConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, KilnError::InvalidInput { .. }));
}
