use res_localize::{
    BoundResource, Direction, EntryId, Language, LocalizationController, LocalizationEntry,
    LocalizationStorage, LocalizeConfig, ResourceData, StorageStore as _, TomlStorageStore,
    ValueType, open_controller,
};
use rstest::{fixture, rstest};
use std::sync::Arc;
use tempfile::TempDir;
use unic_langid::langid;

#[fixture]
fn controller() -> LocalizationController {
    let english = Language::with_display_name(langid!("en"), "English");
    let mut storage = LocalizationStorage::new(english);
    storage
        .add_language(Language::with_display_name(langid!("fr"), "Français"))
        .unwrap();
    storage
        .register_value_type(ValueType::text(), ResourceData::text("???"))
        .unwrap();
    storage
        .add_entry(
            LocalizationEntry::builder()
                .id("greeting")
                .name("Greeting")
                .value_type(ValueType::text())
                .resources(vec![
                    res_localize::Resource::text("Hello"),
                    res_localize::Resource::text("Bonjour"),
                ])
                .build()
                .unwrap(),
        )
        .unwrap();

    LocalizationController::builder()
        .storage(storage.into_shared())
        .host_language(langid!("en"))
        .build()
        .unwrap()
}

fn greeting(controller: &mut LocalizationController) -> ResourceData {
    controller.resolve(&EntryId::from("greeting"), &ValueType::text())
}

#[rstest]
fn switching_and_cycling(mut controller: LocalizationController) {
    controller.set_language(&langid!("fr")).unwrap();
    assert_eq!(greeting(&mut controller), ResourceData::text("Bonjour"));

    controller.cycle_language(Direction::Next).unwrap();
    assert_eq!(controller.active_language().unwrap().code(), &langid!("en"));
    assert_eq!(greeting(&mut controller), ResourceData::text("Hello"));

    controller.cycle_language(Direction::Previous).unwrap();
    assert_eq!(controller.active_language().unwrap().code(), &langid!("fr"));
    assert_eq!(controller.active_language().unwrap().to_string(), "Français");
}

#[rstest]
fn bound_label_follows_the_language(mut controller: LocalizationController) {
    let label = Arc::new(BoundResource::new("greeting", ValueType::text()));
    let missing = Arc::new(BoundResource::new("farewell", ValueType::text()));
    controller.subscribe(label.clone());
    controller.subscribe(missing.clone());

    for _ in 0..3 {
        controller.cycle_language(Direction::Next).unwrap();
    }

    assert_eq!(label.data(), ResourceData::text("Bonjour"));
    assert_eq!(missing.data(), ResourceData::text("???"));
    assert_eq!(label.deliveries(), 4);

    let report = controller.metrics().report();
    assert_eq!(report.language_switches, 4);
    assert_eq!(report.missing_localizations, 4);
    assert_eq!(report.dictionary_hits, 4);
}

#[test]
fn preference_survives_a_restart() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = LocalizeConfig::new("en", "localization/storage.toml");
    config.preferences_path = Some("localization/preferences.toml".into());
    config.languages = Some(vec!["fr".to_string()]);

    {
        let mut controller =
            open_controller(&config, Some(temp_dir.path()), Some(langid!("en"))).unwrap();
        controller.cycle_language(Direction::Next).unwrap();
        assert_eq!(controller.active_language().unwrap().code(), &langid!("fr"));
    }

    let controller =
        open_controller(&config, Some(temp_dir.path()), Some(langid!("en"))).unwrap();
    assert_eq!(controller.active_language().unwrap().code(), &langid!("fr"));
}

#[test]
fn edits_saved_through_the_store_are_seen_after_reopening() {
    let temp_dir = TempDir::new().unwrap();
    let config = LocalizeConfig::new("en", "storage.toml");

    let controller = open_controller(&config, Some(temp_dir.path()), None).unwrap();
    let id = controller
        .storage()
        .write()
        .create_entry("Title", ValueType::text(), ResourceData::text("Play"))
        .unwrap();
    TomlStorageStore::new(temp_dir.path().join("storage.toml"))
        .save(&controller.storage().read())
        .unwrap();

    let mut reopened = open_controller(&config, Some(temp_dir.path()), None).unwrap();
    assert_eq!(reopened.resolve(&id, &ValueType::text()), ResourceData::text("Play"));
}
