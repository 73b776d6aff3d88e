//! End-to-end store scenarios: the full create → update → select → remove
//! → bulk lifecycle as the UI layer drives it.

use docket_core::model::award::{Award, AwardStatus};
use docket_core::{
    ActorId, AuditAction, BulkAction, CsvExporter, ExportFormat, FilterCriteria, Patch, Record,
    RecordId, RecordStore,
};
use serde_json::json;

fn clerk() -> ActorId {
    ActorId::from("registrar-clerk")
}

fn draft(code: &str, title: &str) -> Award {
    Award {
        code: code.into(),
        title: title.into(),
        union_name: "Australian Teachers Union".into(),
        registration_date: "2024-03-01".into(),
        ..Award::default()
    }
}

#[test]
fn create_then_update_produces_a_minimal_status_diff() {
    let mut store = RecordStore::new();
    let created = store
        .create(draft("AW-001", "Teachers Award 2024"), &clerk())
        .expect("create");
    assert_eq!(created.status, AwardStatus::Draft);

    store
        .update(
            &created.id,
            &Patch::new().set("status", json!("active")),
            &clerk(),
        )
        .expect("update");

    let entries = store.audit().entries();
    assert_eq!(entries.len(), 2);

    let second = &entries[1];
    assert_eq!(second.action, AuditAction::Update);
    assert_eq!(second.changes.len(), 1, "only the changed field appears");
    assert_eq!(second.changes["status"].old, Some(json!("draft")));
    assert_eq!(second.changes["status"].new, Some(json!("active")));
}

#[test]
fn remove_prunes_selection_and_collection_together() {
    let mut store = RecordStore::new();
    let ids: Vec<RecordId> = (1..=3)
        .map(|n| {
            store
                .create(draft(&format!("AW-00{n}"), &format!("Award {n}")), &clerk())
                .expect("create")
                .id
        })
        .collect();

    store.select(&ids[0]).expect("select");
    store.select(&ids[1]).expect("select");

    store.remove(&ids[0], &clerk()).expect("remove");

    assert_eq!(store.selected_ids(), vec![ids[1].clone()]);
    let remaining: Vec<&RecordId> = store.records().iter().map(Record::id).collect();
    assert_eq!(remaining, vec![&ids[1], &ids[2]]);
}

#[test]
fn select_all_only_touches_the_filtered_view() {
    let mut store = RecordStore::new();
    let ids: Vec<RecordId> = (1..=10)
        .map(|n| {
            store
                .create(draft(&format!("AW-{n:03}"), &format!("Award {n}")), &clerk())
                .expect("create")
                .id
        })
        .collect();

    // Narrow the view to three records.
    for id in &ids[..3] {
        store
            .update(id, &Patch::new().set("status", json!("active")), &clerk())
            .expect("update");
    }

    let active_only = FilterCriteria::new().equals("status", json!("active"));
    store.toggle_select_all(&active_only);

    let selected = store.selected_ids();
    assert_eq!(selected.len(), 3);
    for id in &ids[..3] {
        assert!(store.is_selected(id));
    }
    for id in &ids[3..] {
        assert!(!store.is_selected(id), "hidden ids must stay untouched");
    }
}

#[test]
fn audit_log_grows_by_exactly_one_per_operation() {
    let mut store = RecordStore::new().with_exporter(Box::new(CsvExporter::default()));
    let a = store.create(draft("AW-001", "One"), &clerk()).expect("create").id;
    let b = store.create(draft("AW-002", "Two"), &clerk()).expect("create").id;
    store
        .update(&a, &Patch::new().set("status", json!("active")), &clerk())
        .expect("update");
    store
        .bulk(
            &BulkAction::Export {
                ids: vec![a.clone(), b.clone()],
                format: ExportFormat::Csv,
            },
            &clerk(),
        )
        .expect("export");
    store
        .bulk(&BulkAction::Delete { ids: vec![b] }, &clerk())
        .expect("bulk delete");
    store.remove(&a, &clerk()).expect("remove");

    // Six operations, six entries, and earlier entries never changed.
    let entries = store.audit().entries();
    assert_eq!(entries.len(), 6);
    let actions: Vec<AuditAction> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Create,
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Export,
            AuditAction::Delete,
            AuditAction::Delete,
        ]
    );
    assert!(entries[0].changes.contains_key("title"));
}

#[test]
fn per_entity_history_reads_in_order() {
    let mut store = RecordStore::new();
    let id = store
        .create(draft("AW-001", "Teachers Award 2024"), &clerk())
        .expect("create")
        .id;
    store
        .update(&id, &Patch::new().set("status", json!("active")), &clerk())
        .expect("update");
    store
        .update(
            &id,
            &Patch::new().set("employer", json!("Department of Education")),
            &clerk(),
        )
        .expect("update");

    let history = store.audit().for_entity(&id);
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].action, AuditAction::Create);
    assert!(history[2].changes.contains_key("employer"));
}

#[test]
fn failed_operations_leave_no_trace() {
    let mut store = RecordStore::new();
    let id = store
        .create(draft("AW-001", "Teachers Award 2024"), &clerk())
        .expect("create")
        .id;

    // Unknown field: rejected before mutation or audit.
    assert!(
        store
            .update(&id, &Patch::new().set("tenure", json!("x")), &clerk())
            .is_err()
    );
    // Patch that breaks validation: likewise.
    assert!(
        store
            .update(&id, &Patch::new().set("title", json!("")), &clerk())
            .is_err()
    );

    assert_eq!(store.audit().len(), 1);
    assert_eq!(
        store.get(&id).expect("present").title,
        "Teachers Award 2024"
    );
}

#[test]
fn view_tuple_matches_ui_contract() {
    let mut store = RecordStore::new();
    for n in 1..=4 {
        store
            .create(draft(&format!("AW-00{n}"), &format!("Award {n}")), &clerk())
            .expect("create");
    }
    let ids: Vec<RecordId> = store.records().iter().map(|r| r.id.clone()).collect();
    store.select(&ids[0]).expect("select");

    let view = store.view(&FilterCriteria::new().search("award"));
    assert_eq!(view.records.len(), 4);
    assert_eq!(view.selected_ids, vec![ids[0].clone()]);
    assert_eq!(view.total_count, 4);
}
