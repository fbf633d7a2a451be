//! PersistentSettings load/save: small user-preference record
//! next to Configs. Every field already carries `#[serde(default)]` in
//! `nb_types::PersistentSettings`, so a record written by an older
//! version of this crate that is missing a newer key deserialises with
//! that key filled from [`PersistentSettings::default`] rather than
//! failing to parse, for forward compatibility with older records.

use crate::error::Result;
use nb_core::path;
use nb_types::PersistentSettings;

/// Load `persistent_settings.yaml` for `project_name`, or return the
/// canonical default record if none has been written yet — unlike
/// Configs, PersistentSettings has no "must be created first" step.
pub fn load(project_name: &str) -> Result<PersistentSettings> {
    let settings_path = path::persistent_settings_path(project_name)?;
    if !settings_path.exists() {
        return Ok(PersistentSettings::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    let settings: PersistentSettings = serde_yaml::from_str(&content)?;
    Ok(settings)
}

pub fn save(project_name: &str, settings: &PersistentSettings) -> Result<()> {
    let settings_path = path::persistent_settings_path(project_name)?;
    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(&settings_path, yaml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static HOME_LOCK: Mutex<()> = Mutex::new(());

    fn with_temp_home<T>(f: impl FnOnce() -> T) -> T {
        let _guard = HOME_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_var("DATASHUTTLE_HOME", tmp.path());
        let result = f();
        std::env::remove_var("DATASHUTTLE_HOME");
        result
    }

    #[test]
    fn load_without_file_returns_defaults() {
        with_temp_home(|| {
            let settings = load("myproject").unwrap();
            assert_eq!(settings, PersistentSettings::default());
        });
    }

    #[test]
    fn save_then_load_round_trips() {
        with_temp_home(|| {
            let mut settings = PersistentSettings::default();
            settings.tui.dark_mode = true;
            save("myproject", &settings).unwrap();

            let reloaded = load("myproject").unwrap();
            assert!(reloaded.tui.dark_mode);
        });
    }

    #[test]
    fn missing_keys_in_an_older_file_fall_back_to_defaults() {
        with_temp_home(|| {
            let settings_path = path::persistent_settings_path("myproject").unwrap();
            std::fs::create_dir_all(settings_path.parent().unwrap()).unwrap();
            // An older record missing `name_templates` and `tui` entirely.
            std::fs::write(&settings_path, "top_level_folder: derivatives\n").unwrap();

            let settings = load("myproject").unwrap();
            assert_eq!(
                settings.top_level_folder,
                nb_types::TopLevelFolder::Derivatives
            );
            assert_eq!(settings.tui, Default::default());
        });
    }
}
