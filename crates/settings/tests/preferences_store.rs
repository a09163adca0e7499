use piecraft_printing::{mm_to_pt, PaperId};
use piecraft_settings::{PaperChoice, Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = PreferencesStore::default_path(temp.path());

    let store = PreferencesStore::load(&path).expect("load defaults");
    let prefs = store.preferences();
    assert_eq!(prefs.export.paper, PaperChoice::A4);
    assert_eq!(prefs.export.branding, "WizardTim.com");
    assert_eq!(prefs.export.margins_mm.bottom, 35.0);
    assert!(!prefs.preview.enabled);
    assert_eq!(prefs.preview.zoom_levels, vec![50]);
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = PreferencesStore::default_path(temp.path());

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.export.branding = "Pie Guild".to_string();
            prefs.export.margins_mm.left = 18.0;
            prefs.preview.zoom_levels = vec![100, 25];
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    let prefs = reloaded.preferences();
    assert_eq!(prefs.export.branding, "Pie Guild");
    assert_eq!(prefs.export.margins_mm.left, 18.0);
    assert_eq!(prefs.preview.zoom_levels, vec![25, 100]);

    let options = prefs.to_export_options();
    assert!((options.margins.left - mm_to_pt(18.0)).abs() < 1e-3);
}

#[test]
fn legacy_file_is_upgraded_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "export": {
                "paper": "letter",
                "page_indicator": "&zPage"
            }
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(
        prefs.version, 1,
        "legacy preferences should be upgraded to schema version 1"
    );
    assert_eq!(
        prefs.export.page_indicator, "&rPage &p of &P",
        "unparseable footer template should fall back to default"
    );
    assert_eq!(
        prefs.to_export_options().paper.id,
        PaperId::Letter,
        "specified paper should be preserved during migration"
    );
    assert_eq!(
        prefs.export.branding, "WizardTim.com",
        "missing fields should take their defaults"
    );
}
