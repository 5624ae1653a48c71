use serde_json::json;

use super::test_db;
use crate::event_settings::{DEFAULT_EVENT_NAME, EventSettings, SettingsPatch, UpsertOutcome};

#[test]
fn test_defaults_before_first_write() {
    let db = test_db();
    let settings = db.get_event_settings().unwrap();
    assert_eq!(settings, EventSettings::default());
    assert_eq!(settings.event_name.as_deref(), Some(DEFAULT_EVENT_NAME));
    assert!(settings.event_slogan.is_none());
    assert!(settings.program_data.is_none());
}

#[test]
fn test_first_write_inserts_over_defaults() {
    let mut db = test_db();
    let patch = SettingsPatch {
        event_slogan: Some(Some("Stream together".into())),
        program_data: Some(Some(json!([{"time": "18:00", "title": "Opening"}]))),
        ..Default::default()
    };

    assert_eq!(db.upsert_event_settings(&patch).unwrap(), UpsertOutcome::Inserted);

    let settings = db.get_event_settings().unwrap();
    assert_eq!(settings.event_name.as_deref(), Some(DEFAULT_EVENT_NAME));
    assert_eq!(settings.event_slogan.as_deref(), Some("Stream together"));
    assert_eq!(
        settings.program_data,
        Some(json!([{"time": "18:00", "title": "Opening"}]))
    );
}

#[test]
fn test_disjoint_writes_merge() {
    let mut db = test_db();
    db.upsert_event_settings(&SettingsPatch {
        event_name: Some(Some("Meetup".into())),
        event_location: Some(Some("Moscow".into())),
        ..Default::default()
    })
    .unwrap();

    let outcome = db
        .upsert_event_settings(&SettingsPatch {
            organizer_name: Some(Some("Ivan".into())),
            about_content: Some(Some("About us".into())),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);

    let settings = db.get_event_settings().unwrap();
    assert_eq!(settings.event_name.as_deref(), Some("Meetup"));
    assert_eq!(settings.event_location.as_deref(), Some("Moscow"));
    assert_eq!(settings.organizer_name.as_deref(), Some("Ivan"));
    assert_eq!(settings.about_content.as_deref(), Some("About us"));
}

#[test]
fn test_explicit_null_clears_field() {
    let mut db = test_db();
    db.upsert_event_settings(&SettingsPatch {
        event_slogan: Some(Some("Old slogan".into())),
        program_data: Some(Some(json!({"day": 1}))),
        ..Default::default()
    })
    .unwrap();

    db.upsert_event_settings(&SettingsPatch {
        event_slogan: Some(None),
        program_data: Some(Some(serde_json::Value::Null)),
        ..Default::default()
    })
    .unwrap();

    let settings = db.get_event_settings().unwrap();
    assert!(settings.event_slogan.is_none());
    assert!(settings.program_data.is_none());
    assert_eq!(settings.event_name.as_deref(), Some(DEFAULT_EVENT_NAME));
}

#[test]
fn test_empty_patch_on_existing_row_keeps_values() {
    let mut db = test_db();
    db.upsert_event_settings(&SettingsPatch {
        event_name: Some(Some("Kept".into())),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(
        db.upsert_event_settings(&SettingsPatch::default()).unwrap(),
        UpsertOutcome::Updated
    );
    assert_eq!(
        db.get_event_settings().unwrap().event_name.as_deref(),
        Some("Kept")
    );
}

#[test]
fn test_non_json_program_data_is_returned_as_text() {
    let mut db = test_db();
    db.upsert_event_settings(&SettingsPatch::default()).unwrap();
    db.with_conn(|conn| {
        conn.execute(
            "UPDATE event_settings SET program_data = 'plain text' WHERE id = 1",
            [],
        )?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        db.get_event_settings().unwrap().program_data,
        Some(json!("plain text"))
    );
}
