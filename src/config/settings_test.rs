use super::Settings;
use tempfile::TempDir;

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();

    assert!(!settings.early_access, "early access is opt-in");
    assert!(settings.auto_download);
    assert!(!settings.auto_install, "installing must be confirmed");
    assert!(settings.show_release_notes);
}

#[test]
fn test_settings_save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        early_access: true,
        auto_download: false,
        ..Default::default()
    };

    settings
        .save(&settings_path)
        .expect("Failed to save settings");
    let loaded = Settings::load(&settings_path).expect("Failed to load settings");

    assert!(loaded.early_access);
    assert!(!loaded.auto_download);
    assert!(!loaded.auto_install);
}

#[test]
fn test_settings_load_nonexistent_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.json");

    let settings = Settings::load(&missing).expect("Failed to load settings");

    assert!(!settings.early_access);
}

#[test]
fn test_settings_deserialization_without_early_access_field() {
    // Settings written before the early-access channel existed still load.
    let json = r#"{
        "auto_download": true,
        "auto_install": false,
        "show_release_notes": true
    }"#;

    let settings: Settings = serde_json::from_str(json).expect("Failed to deserialize settings");

    assert!(
        !settings.early_access,
        "missing early_access field should default to false"
    );
}

#[test]
fn test_settings_load_rejects_malformed_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings_path = temp_dir.path().join("settings.json");
    std::fs::write(&settings_path, "{not json").unwrap();

    assert!(Settings::load(&settings_path).is_err());
}
