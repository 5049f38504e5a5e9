//! Error handling and edge case tests.

use serde_json::json;
use tracked_collection::{
    CollectionError, CollectionEvent, CollectionManager, CollectionSnapshot, Record,
    SubscriptionConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn manager_with(n: usize) -> CollectionManager {
    init_tracing();
    CollectionManager::new((0..n).map(|i| Record::from_value(json!({ "i": i })).unwrap()))
}

// --- Out of bounds ---

#[test]
fn test_remove_out_of_bounds() {
    let manager = manager_with(2);
    let before = manager.items();

    let result = manager.remove(2);

    assert!(matches!(
        result,
        Err(CollectionError::OutOfBounds { index: 2, len: 2 })
    ));
    assert!(manager.items().ptr_eq(&before));
    assert!(!manager.is_dirty());
}

#[test]
fn test_remove_from_empty() {
    let manager = manager_with(0);
    let err = manager.remove(0).unwrap_err();
    assert_eq!(err.index(), Some(0));
    assert!(manager.is_empty());
}

#[test]
fn test_update_out_of_bounds() {
    let manager = manager_with(1);
    let before = manager.items();

    let result = manager.update(usize::MAX, "i", json!(9));

    assert!(matches!(
        result,
        Err(CollectionError::OutOfBounds { index: usize::MAX, len: 1 })
    ));
    assert!(manager.items().ptr_eq(&before));
}

#[test]
fn test_error_message_names_index() {
    let manager = manager_with(1);
    let err = manager.update(4, "i", json!(0)).unwrap_err();
    assert_eq!(err.to_string(), "Index 4 out of bounds (len 1)");
}

#[test]
fn test_retry_after_out_of_bounds() {
    let manager = manager_with(3);

    assert!(manager.remove(3).is_err());
    manager.remove(2).unwrap();

    assert_eq!(manager.len(), 2);
    assert_eq!(manager.removed_items().len(), 1);
}

#[test]
fn test_index_is_checked_against_current_length() {
    let manager = manager_with(1);
    manager.create(Record::empty());

    // Index 1 is beyond the baseline but valid in the current sequence.
    manager.update(1, "x", json!(true)).unwrap();
    manager.remove(1).unwrap();

    assert!(manager.remove(1).is_err());
    assert!(!manager.is_dirty());
}

#[test]
fn test_failed_operation_emits_no_event() {
    let manager = manager_with(1);
    let handle = manager.subscribe(SubscriptionConfig::default()).unwrap();

    assert!(manager.remove(7).is_err());
    assert!(handle.try_recv().is_err());

    manager.remove(0).unwrap();
    assert!(matches!(
        handle.try_recv().unwrap(),
        CollectionEvent::Changed { .. }
    ));
}

// --- Records ---

#[test]
fn test_non_object_record_rejected() {
    for value in [json!(null), json!(1), json!("s"), json!([1]), json!(true)] {
        assert!(matches!(
            Record::from_value(value),
            Err(CollectionError::NotAnObject(_))
        ));
    }
}

#[test]
fn test_decode_into_wrong_type() {
    let record = Record::from_value(json!({"name": "x"})).unwrap();
    let result = record.decode::<Vec<u32>>();
    assert!(matches!(result, Err(CollectionError::Deserialization(_))));
}

#[test]
fn test_missing_field_reads_null() {
    let record = Record::from_value(json!({"name": "x"})).unwrap();
    assert_eq!(record["missing"], json!(null));
    assert!(record.get("missing").is_none());
}

// --- Snapshots ---

#[test]
fn test_truncated_msgpack_rejected() {
    let manager = manager_with(2);
    let bytes = manager.snapshot().to_msgpack().unwrap();

    let result = CollectionSnapshot::from_msgpack(&bytes[..bytes.len() / 2]);
    assert!(matches!(result, Err(CollectionError::Deserialization(_))));
}
