use folio_core::model::{IdPolicy, Record, RecordId};
use folio_core::ops::{find, next_id_at, remove_from, upsert_into, UpsertOutcome};
use proptest::prelude::*;
use serde_json::{json, Value};

fn records_from_ids(ids: &[u64]) -> Vec<Record> {
    ids.iter()
        .map(|id| Record::from_value(json!({ "id": id })).unwrap())
        .collect()
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

proptest! {
    #[test]
    fn next_id_never_collides(
        ids in proptest::collection::vec(prop_oneof![0u64..10_000, (u64::MAX - 40)..=u64::MAX], 0..40),
        now in prop_oneof![0i64..20_000, Just(i64::MAX)],
    ) {
        let records = records_from_ids(&ids);
        for policy in [IdPolicy::MaxPlusOne, IdPolicy::Timestamp] {
            let next = RecordId::new(id_text(&next_id_at(&records, policy, now)));
            prop_assert!(find(&records, &next).is_none());
        }
    }

    #[test]
    fn upsert_then_find_yields_single_identical_record(ids in proptest::collection::vec(1u64..500, 0..20), title in "[a-z]{1,12}") {
        let mut records = records_from_ids(&ids);
        let record = Record::from_value(json!({ "title": title })).unwrap();
        let (id, outcome) = upsert_into(&mut records, record, IdPolicy::MaxPlusOne);

        prop_assert_eq!(outcome, UpsertOutcome::Inserted);
        let matches: Vec<_> = records.iter().filter(|r| r.has_id(&id)).collect();
        prop_assert_eq!(matches.len(), 1);
        prop_assert_eq!(matches[0].get_str("title"), Some(title.as_str()));
    }

    #[test]
    fn remove_present_shrinks_by_one(n in 1usize..30, pick in 0usize..30) {
        let ids: Vec<u64> = (1..=n as u64).collect();
        let mut records = records_from_ids(&ids);
        let target = RecordId::new(ids[pick % n].to_string());

        let removed = remove_from(&mut records, &target);

        prop_assert!(removed.is_some());
        prop_assert_eq!(records.len(), n - 1);
        prop_assert!(find(&records, &target).is_none());
    }
}

#[test]
fn test_empty_collection_upsert_scenario() {
    let mut records = Vec::new();
    upsert_into(
        &mut records,
        Record::from_value(json!({"title": "A"})).unwrap(),
        IdPolicy::MaxPlusOne,
    );
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([{"id": 1, "title": "A"}])
    );
}

#[test]
fn test_upsert_at_id_ceiling_inserts_instead_of_replacing() {
    for policy in [IdPolicy::MaxPlusOne, IdPolicy::Timestamp] {
        let mut records = records_from_ids(&[u64::MAX, 1]);
        let (id, outcome) = upsert_into(
            &mut records,
            Record::from_value(json!({"title": "new"})).unwrap(),
            policy,
        );

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(id.as_str(), "2");
        assert_eq!(records.len(), 3);
        assert!(find(&records, &RecordId::new(u64::MAX.to_string())).is_some());
    }
}
