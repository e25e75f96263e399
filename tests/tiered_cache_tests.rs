//! Integration Tests for the two-tier cache
//!
//! Exercises tier fallback, write-through and memoization through the public
//! API, using an in-process remote tier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use tiered_cache::remote::RemoteStore;
use tiered_cache::{
    async_cached, cached, CacheManager, CallArgs, MemoizeOptions, MemoryRemote, TtlCache,
    DEFAULT_TTL,
};

fn manager_with(remote: &Arc<MemoryRemote>) -> CacheManager {
    CacheManager::new(TtlCache::new(100, DEFAULT_TTL), Some(remote.clone()))
}

// == Tier Fallback ==

#[tokio::test]
async fn test_local_only_set_then_get() {
    let manager = CacheManager::local_only(100, DEFAULT_TTL);

    manager.set("k", json!("v"), DEFAULT_TTL).await;

    assert_eq!(manager.get("k").await, Some(json!("v")));
}

#[tokio::test]
async fn test_write_through_survives_remote_side_deletion() {
    let remote = Arc::new(MemoryRemote::new());
    let manager = manager_with(&remote);

    manager.set("k", json!({"n": 1}), DEFAULT_TTL).await;

    // Deleted on the remote side by someone else
    assert_eq!(remote.delete("k").await.unwrap(), 1);

    assert_eq!(manager.get("k").await, Some(json!({"n": 1})));
}

#[tokio::test]
async fn test_remote_is_shared_between_instances() {
    let remote = Arc::new(MemoryRemote::new());
    let writer = manager_with(&remote);
    let reader = manager_with(&remote);

    writer.set("shared", json!([1, 2]), DEFAULT_TTL).await;

    assert_eq!(reader.get("shared").await, Some(json!([1, 2])));
    assert_eq!(reader.get_stats().await.local_size, 0);
}

#[tokio::test]
async fn test_no_cross_instance_invalidation_of_local_tier() {
    let remote = Arc::new(MemoryRemote::new());
    let first = manager_with(&remote);
    let second = manager_with(&remote);

    first.set("k", json!(1), DEFAULT_TTL).await;
    second.set("k", json!(2), DEFAULT_TTL).await;

    // Remote holds the latest write; the stale local copy in `first` is only
    // visible once the remote copy is gone.
    assert_eq!(first.get("k").await, Some(json!(2)));
    remote.delete("k").await.unwrap();
    assert_eq!(first.get("k").await, Some(json!(1)));
}

#[tokio::test]
async fn test_outage_then_recovery() {
    let remote = Arc::new(MemoryRemote::new());
    let manager = manager_with(&remote);

    remote.set_available(false);
    assert!(manager.set("k", json!("written during outage"), DEFAULT_TTL).await);
    assert_eq!(manager.get("k").await, Some(json!("written during outage")));
    assert_eq!(manager.clear_pattern("*").await, 0);

    remote.set_available(true);
    assert_eq!(remote.peek("k"), None);
    assert_eq!(manager.get("k").await, Some(json!("written during outage")));
}

#[tokio::test]
async fn test_absent_versus_falsy() {
    let manager = CacheManager::local_only(10, DEFAULT_TTL);

    manager.set("empty", json!(""), DEFAULT_TTL).await;
    manager.set("zero", json!(0), DEFAULT_TTL).await;
    manager.set("no", json!(false), DEFAULT_TTL).await;

    assert_eq!(manager.get("empty").await, Some(json!("")));
    assert_eq!(manager.get("zero").await, Some(json!(0)));
    assert_eq!(manager.get("no").await, Some(json!(false)));
    assert_eq!(manager.get("never-set").await, None);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_expiry_in_both_tiers() {
    let remote = Arc::new(MemoryRemote::new());
    let manager = manager_with(&remote);

    manager.set("k", json!("v"), Duration::from_secs(30)).await;

    tokio::time::advance(Duration::from_secs(29)).await;
    assert_eq!(manager.get("k").await, Some(json!("v")));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(manager.get("k").await, None);
}

// == Memoization ==

#[tokio::test]
async fn test_memoized_double() {
    let cache = Arc::new(CacheManager::local_only(100, DEFAULT_TTL));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let double = cached(
        cache,
        "double",
        MemoizeOptions::new().key_prefix("test").ttl(Duration::from_secs(60)),
        move |(x,): (i64,)| {
            counter.fetch_add(1, Ordering::SeqCst);
            x * 2
        },
    );

    assert_eq!(double.call((5,)).await, 10);
    assert_eq!(double.call((5,)).await, 10);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(double.call((6,)).await, 12);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_memoized_results_visible_through_remote() {
    let remote = Arc::new(MemoryRemote::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let make = |cache: CacheManager| {
        let counter = calls.clone();
        async_cached(
            Arc::new(cache),
            "prompt",
            MemoizeOptions::new().key_prefix("ai"),
            move |args: CallArgs| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    format!("answer to {}", args.positional().join(" "))
                }
            },
        )
    };
    let first = make(manager_with(&remote));
    let second = make(manager_with(&remote));

    let args = CallArgs::new().arg("hola").kwarg("model", "small");
    assert_eq!(first.call(args.clone()).await, "answer to hola");
    assert_eq!(second.call(args).await, "answer to hola");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(remote.peek("ai:prompt:hola:model=small").is_some());
}

#[tokio::test]
async fn test_memoized_keyword_order_independent() {
    let cache = Arc::new(CacheManager::local_only(100, DEFAULT_TTL));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let f = async_cached(cache, "f", MemoizeOptions::new(), move |args: CallArgs| {
        counter.fetch_add(1, Ordering::SeqCst);
        let total: i64 = ["a", "b"]
            .iter()
            .filter_map(|name| args.keyword(name))
            .filter_map(|v| v.parse::<i64>().ok())
            .sum();
        async move { total }
    });

    let ab = f.call(CallArgs::new().kwarg("a", 1).kwarg("b", 2)).await;
    let ba = f.call(CallArgs::new().kwarg("b", 2).kwarg("a", 1)).await;

    assert_eq!((ab, ba), (3, 3));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_memoized_falsy_result_not_recomputed() {
    let cache = Arc::new(CacheManager::local_only(100, DEFAULT_TTL));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let is_even = cached(cache, "is_even", MemoizeOptions::new(), move |(x,): (u32,)| {
        counter.fetch_add(1, Ordering::SeqCst);
        x % 2 == 0
    });

    assert!(!is_even.call((3,)).await);
    assert!(!is_even.call((3,)).await);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// == Properties ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // With the remote tier up or down, a write is always readable back.
    #[test]
    fn prop_set_then_get_any_tier_state(
        key in "[a-z:]{1,16}",
        value in prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z ]{0,16}".prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            Just(Value::Null),
        ],
        remote_up in any::<bool>()
    ) {
        tokio_test::block_on(async {
            let remote = Arc::new(MemoryRemote::new());
            remote.set_available(remote_up);
            let manager = manager_with(&remote);

            prop_assert!(manager.set(&key, value.clone(), DEFAULT_TTL).await);
            prop_assert_eq!(manager.get(&key).await, Some(value));
            Ok(())
        })?;
    }

    // Equal arguments invoke the callable once; distinct arguments once each.
    #[test]
    fn prop_memoized_calls_once_per_distinct_args(
        inputs in prop::collection::vec(0i64..10, 1..30)
    ) {
        tokio_test::block_on(async {
            let cache = Arc::new(CacheManager::local_only(100, DEFAULT_TTL));
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = calls.clone();
            let square = cached(cache, "square", MemoizeOptions::new(), move |(x,): (i64,)| {
                counter.fetch_add(1, Ordering::SeqCst);
                x * x
            });

            for x in &inputs {
                prop_assert_eq!(square.call((*x,)).await, x * x);
            }

            let distinct: std::collections::HashSet<_> = inputs.iter().collect();
            prop_assert_eq!(calls.load(Ordering::SeqCst), distinct.len());
            Ok(())
        })?;
    }
}
