//! Fuzz patch application: arbitrary JSON objects applied to an award must
//! never panic, never change the id, and never produce an invalid record.

#![no_main]

use docket_core::model::award::Award;
use docket_core::model::record::{Patch, Record};
use docket_core::model::record_id::RecordId;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let mut award = Award {
        code: "AW-FZ1".into(),
        title: "Fuzz Award".into(),
        union_name: "Fuzz Union".into(),
        ..Award::default()
    };
    award.assign_id(RecordId::new_unchecked("dk-fz01"));

    let patch: Patch = fields.into_iter().collect();
    if let Ok(updated) = patch.apply_to(&award) {
        assert_eq!(updated.id(), award.id());
        assert!(updated.validate().is_ok());
    }
});
