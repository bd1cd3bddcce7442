// Lifecycle logging emitted by Store operations

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{AuditEntry, WebPage};
use rowbind_core::logging_facility::test_capture::init_test_capture;
use rowbind_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_RECORD_TYPE,
};
use rowbind_store::Store;

#[test]
fn test_insert_logs_start_and_end() {
    let capture = init_test_capture();
    let mut store = Store::in_memory();

    store.insert(&WebPage::new("http://log.com/")).unwrap();

    capture.assert_event_exists("insert", EVENT_START);
    capture.assert_event_exists("insert", EVENT_END);
}

#[test]
fn test_failed_update_logs_error_code() {
    let capture = init_test_capture();
    let mut store = Store::in_memory();
    let entry = AuditEntry {
        message: "m".into(),
        level: 0,
    };

    assert!(store.update(&entry).is_err());

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("update")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.fields.get(FIELD_ERR_CODE).map(String::as_str) == Some("ERR_NO_KEY")
    });
    assert!(count >= 1);
}

#[test]
fn test_operations_log_record_type_and_duration() {
    let capture = init_test_capture();
    let mut store = Store::in_memory();

    store.count::<WebPage>().unwrap();

    let record_type = std::any::type_name::<WebPage>();
    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("count")
            && e.event.as_deref() == Some(EVENT_END)
            && e.fields.get(FIELD_RECORD_TYPE).map(String::as_str) == Some(record_type)
            && e.fields.contains_key(FIELD_DURATION_MS)
    });
    assert!(count >= 1);
}
