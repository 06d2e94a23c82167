//! Property-based tests for operation key and suppression determinism

use gitdeck::operation::OperationDescriptor;
use gitdeck::suppression::{MemorySuppressionStore, SuppressionStore};
use gitdeck::types::GitRef;
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_/.-]{0,24}"
}

/// The single-flight key is a pure function of the descriptor.
#[test]
fn test_operation_key_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(name_strategy(), name_strategy(), any::<bool>()),
            |(branch, remote, rebase)| {
                let a = OperationDescriptor::pull(
                    GitRef::local_branch(branch.clone()),
                    Some(GitRef::remote(remote.clone())),
                    rebase,
                );
                let b = OperationDescriptor::pull(
                    GitRef::local_branch(branch.clone()),
                    Some(GitRef::remote(remote)),
                    rebase,
                );
                assert_eq!(a.key(), b.key());
                assert_eq!(a.key().target, branch);
                Ok(())
            },
        )
        .unwrap();
}

/// Push keys depend on the branch only, never the remote.
#[test]
fn test_push_key_remote_independence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(name_strategy(), name_strategy(), name_strategy()),
            |(branch, remote_a, remote_b)| {
                let a = OperationDescriptor::push(
                    Some(GitRef::local_branch(branch.clone())),
                    Some(GitRef::remote(remote_a)),
                );
                let b = OperationDescriptor::push(
                    Some(GitRef::local_branch(branch)),
                    Some(GitRef::remote(remote_b)),
                );
                assert_eq!(a.key(), b.key());
                Ok(())
            },
        )
        .unwrap();
}

/// A suppression decision reads back exactly as written, for any identifier.
#[test]
fn test_suppression_roundtrip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let store = MemorySuppressionStore::new();

    runner
        .run(&(name_strategy(), any::<bool>()), |(identifier, suppress)| {
            store.set(&identifier, suppress).unwrap();
            assert_eq!(store.get(&identifier).unwrap(), suppress);
            Ok(())
        })
        .unwrap();
}
