//! One-shot command tests

use record_confirm::commands::{self, Target};
use record_confirm::error::AppError;
use record_confirm_common::store::{read_document, write_document, DEFAULT_INDENT};
use record_confirm_common::{Config, Record};
use tempfile::tempdir;

fn sample_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("records.json");
    let mut confirmed = Record::new("B2", vec![3]);
    confirmed.confirm("B2-ok".to_string(), vec![4]);
    write_document(
        &path,
        &[Record::new("A1", vec![1, 2]), confirmed],
        DEFAULT_INDENT,
    )
    .unwrap();
    path
}

#[test]
fn test_show_and_search() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = sample_file(dir.path());
    let config = Config::default();

    let mut session = commands::open_session(&config, Some(path.as_path())).unwrap();
    let text = commands::show(&mut session, &config, 1, false).unwrap();
    assert!(text.contains("Identifier:           B2"));
    assert!(text.contains("Confirmed identifier: B2-ok"));

    let json = commands::show(&mut session, &config, 0, true).unwrap();
    assert!(json.contains("\"identifier\": \"A1\""));

    let found = commands::search(&mut session, &config, "B2-ok").unwrap();
    assert!(found.starts_with("Record 2/2"));

    let err = commands::search(&mut session, &config, "Z9").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_modify_keeps_unset_values() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = sample_file(dir.path());
    let config = Config::default();

    let mut session = commands::open_session(&config, Some(path.as_path())).unwrap();
    let form = commands::modify(&mut session, &Target::Search("A1".to_string()), None, Some("5, 6"))
        .unwrap();
    assert_eq!(form.confirmed_identifier, "A1");
    assert_eq!(form.confirmed_results, "5, 6");

    let saved = read_document(&path).unwrap();
    assert_eq!(saved[0].confirmed_identifier.as_deref(), Some("A1"));
    assert_eq!(saved[0].confirmed_results, Some(vec![5, 6]));
    assert_eq!(saved[1].confirmed_identifier.as_deref(), Some("B2-ok"));
}

#[test]
fn test_modify_invalid_results() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = sample_file(dir.path());
    let config = Config::default();

    let mut session = commands::open_session(&config, Some(path.as_path())).unwrap();
    let err = commands::modify(&mut session, &Target::Index(0), Some("A1-x"), Some("1,,2"))
        .unwrap_err();
    assert!(matches!(err, AppError::Record(ref e) if e.is_validation()));
    assert_eq!(read_document(&path).unwrap()[0].confirmed_identifier, None);
}

#[test]
fn test_modify_out_of_range() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = sample_file(dir.path());
    let config = Config::default();

    let mut session = commands::open_session(&config, Some(path.as_path())).unwrap();
    let err = commands::modify(&mut session, &Target::Index(9), None, None).unwrap_err();
    assert!(matches!(err, AppError::Record(_)));
}

#[test]
fn test_no_default_document() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config {
        default_file: Some(dir.path().join("sample.json")),
        ..Config::default()
    };
    let err = commands::open_session(&config, None).err().unwrap();
    assert!(matches!(err, AppError::NoDocument(_)));
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = sample_file(dir.path());
    let config = Config::default();

    let mut session = commands::open_session(&config, Some(path.as_path())).unwrap();
    // the document's folder disappears before the save
    drop(dir);
    let err = commands::modify(&mut session, &Target::Index(0), None, Some("1")).unwrap_err();
    assert!(matches!(err, AppError::SaveFailed(_)));
}

#[test]
fn test_update_config() {
    let mut config = Config::default();
    assert!(!commands::update_config(&mut config, None, None, None));
    assert!(!commands::update_config(&mut config, None, Some(4), None));

    let file = std::path::PathBuf::from("/data/review.json");
    assert!(commands::update_config(&mut config, Some(file.clone()), Some(2), Some(320)));
    assert_eq!(config.default_file, Some(file));
    assert_eq!(config.indent, 2);
    assert_eq!(config.max_image_edge, 320);
}
