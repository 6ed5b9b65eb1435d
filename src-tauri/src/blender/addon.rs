use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use super::types::{AddonInstallOutcome, ADDON_FILE_NAME};

/// Source embarquée de l'addon de contrôle, copiée telle quelle à destination.
const ADDON_SOURCE: &str = include_str!("../../resources/blender_ai_addon.py");

static RESOURCE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialise le répertoire de ressources Tauri utilisé pour résoudre les
/// assets embarqués.
pub fn init_resource_dir(dir: PathBuf) {
    let _ = RESOURCE_DIR.set(dir);
}

/// Retourne la source de l'addon: la copie du répertoire de ressources si elle
/// existe (asset patché sans rebuild), sinon la version compilée.
fn addon_source() -> Cow<'static, str> {
    if let Some(resource_dir) = RESOURCE_DIR.get() {
        let candidate = resource_dir.join("resources").join(ADDON_FILE_NAME);
        if let Ok(contents) = fs::read_to_string(&candidate) {
            return Cow::Owned(contents);
        }
    }
    Cow::Borrowed(ADDON_SOURCE)
}

/// Parse un nom de dossier de version Blender (`4.2`, `3.6.1`).
fn parse_version_folder(input: &str) -> Option<(u32, u32, u32)> {
    let mut parts = input.split('.');
    let major = parts.next()?.parse::<u32>().ok()?;
    let minor = parts.next().unwrap_or("0").parse::<u32>().ok()?;
    let patch = parts.next().unwrap_or("0").parse::<u32>().ok()?;
    Some((major, minor, patch))
}

/// Racine de configuration utilisateur de Blender sur la plateforme courante.
fn user_config_root() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    if cfg!(target_os = "windows") {
        Some(config_dir.join("Blender Foundation").join("Blender"))
    } else if cfg!(target_os = "macos") {
        Some(config_dir.join("Blender"))
    } else {
        Some(config_dir.join("blender"))
    }
}

/// Retourne la version la plus récente trouvée sous la racine de configuration
/// et le répertoire `scripts/addons` correspondant.
fn find_latest_addons_dir(config_root: &Path) -> Result<(String, PathBuf), String> {
    if !config_root.exists() {
        return Err(format!(
            "Blender user configuration not found at {}",
            config_root.display()
        ));
    }

    let entries = fs::read_dir(config_root)
        .map_err(|e| format!("Failed listing {}: {e}", config_root.display()))?;

    let mut versions: Vec<(String, (u32, u32, u32))> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(parsed) = parse_version_folder(name) {
            versions.push((name.to_string(), parsed));
        }
    }

    versions.sort_by(|a, b| b.1.cmp(&a.1));
    let Some((latest_version, _)) = versions.first() else {
        return Err(format!(
            "No Blender version folders found in {}",
            config_root.display()
        ));
    };

    let addons_dir = config_root
        .join(latest_version)
        .join("scripts")
        .join("addons");
    Ok((latest_version.clone(), addons_dir))
}

/// Retrouve, au mieux, un composant de chemin ressemblant à une version.
fn detect_version_from_path(path: &Path) -> Option<String> {
    path.components().rev().find_map(|component| match component {
        Component::Normal(name) => {
            let name = name.to_str()?;
            parse_version_folder(name).map(|_| name.to_string())
        }
        _ => None,
    })
}

/// Écrit la source de l'addon dans le répertoire de destination, en écrasant
/// une copie existante. Réexécuter produit le même état final.
fn install_into(
    addons_dir: &Path,
    detected_version: Option<String>,
    source: &str,
) -> AddonInstallOutcome {
    let addon_path = addons_dir.join(ADDON_FILE_NAME);
    let addon_path_str = addon_path.to_string_lossy().to_string();

    if let Err(e) = fs::create_dir_all(addons_dir) {
        log::warn!("Failed creating addons directory {}: {e}", addons_dir.display());
        return AddonInstallOutcome {
            installed: false,
            addon_path: Some(addon_path_str),
            detected_version,
            message: format!(
                "Failed creating addons directory {}: {e}",
                addons_dir.display()
            ),
        };
    }

    if let Err(e) = fs::write(&addon_path, source) {
        log::warn!("Failed writing addon file {addon_path_str}: {e}");
        return AddonInstallOutcome {
            installed: false,
            addon_path: Some(addon_path_str),
            detected_version,
            message: format!("Failed writing addon file: {e}"),
        };
    }

    log::info!("Addon installed at {addon_path_str}");
    let message = match detected_version.as_deref() {
        Some(version) => format!(
            "Addon installed for Blender {version}. In Blender Preferences > Add-ons, enable 'Interface: Blender AI'."
        ),
        None => format!(
            "Addon installed to {addon_path_str}. In Blender Preferences > Add-ons, enable 'Interface: Blender AI'."
        ),
    };

    AddonInstallOutcome {
        installed: true,
        addon_path: Some(addon_path_str),
        detected_version,
        message,
    }
}

/// Installe l'addon de contrôle. Sans cible explicite, la destination est le
/// répertoire d'addons de la version la plus récente de la configuration
/// utilisateur Blender; un prérequis manquant est un échec doux, pas une
/// erreur, et ne déclenche aucun scan d'installation.
pub fn install_addon(target_dir: Option<&Path>) -> AddonInstallOutcome {
    if let Some(dir) = target_dir {
        let detected_version = detect_version_from_path(dir);
        return install_into(dir, detected_version, &addon_source());
    }

    let Some(config_root) = user_config_root() else {
        return AddonInstallOutcome {
            installed: false,
            addon_path: None,
            detected_version: None,
            message: "No user configuration directory is available on this system.".to_string(),
        };
    };

    match find_latest_addons_dir(&config_root) {
        Ok((version, addons_dir)) => {
            install_into(&addons_dir, Some(version), &addon_source())
        }
        Err(e) => AddonInstallOutcome {
            installed: false,
            addon_path: None,
            detected_version: None,
            message: format!(
                "{e}. Start Blender once so it creates its configuration, then retry."
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let addons_dir = temp.path().join("4.2").join("scripts").join("addons");

        let first = install_into(&addons_dir, Some("4.2".to_string()), "print('hi')\n");
        assert!(first.installed);
        let written_once = fs::read(addons_dir.join(ADDON_FILE_NAME)).unwrap();

        let second = install_into(&addons_dir, Some("4.2".to_string()), "print('hi')\n");
        assert!(second.installed);
        let written_twice = fs::read(addons_dir.join(ADDON_FILE_NAME)).unwrap();

        assert_eq!(written_once, written_twice);
        assert_eq!(first.installed, second.installed);
        assert_eq!(first.addon_path, second.addon_path);
    }

    #[test]
    fn install_overwrites_existing_addon() {
        let temp = tempfile::tempdir().unwrap();
        let addons_dir = temp.path().to_path_buf();
        fs::write(addons_dir.join(ADDON_FILE_NAME), "old contents").unwrap();

        let outcome = install_into(&addons_dir, None, "new contents");
        assert!(outcome.installed);
        let written = fs::read_to_string(addons_dir.join(ADDON_FILE_NAME)).unwrap();
        assert_eq!(written, "new contents");
    }

    #[test]
    fn failed_install_with_explicit_target_still_reports_addon_path() {
        let temp = tempfile::tempdir().unwrap();
        // Un fichier à la place du répertoire cible fait échouer create_dir_all.
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();
        let target = blocker.join("addons");

        let outcome = install_into(&target, None, "contents");
        assert!(!outcome.installed);
        assert!(outcome.addon_path.is_some());
        assert!(!outcome.message.is_empty());
    }

    #[test]
    fn missing_config_root_is_a_soft_failure() {
        let temp = tempfile::tempdir().unwrap();
        let absent = temp.path().join("never-created");

        let err = find_latest_addons_dir(&absent).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn latest_version_folder_wins() {
        let temp = tempfile::tempdir().unwrap();
        for version in ["3.6", "4.2", "4.10", "notes"] {
            fs::create_dir_all(temp.path().join(version)).unwrap();
        }

        let (version, addons_dir) = find_latest_addons_dir(temp.path()).unwrap();
        assert_eq!(version, "4.10");
        assert!(addons_dir.ends_with(Path::new("4.10/scripts/addons")));
    }

    #[test]
    fn config_root_without_version_folders_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("cache")).unwrap();

        let err = find_latest_addons_dir(temp.path()).unwrap_err();
        assert!(err.contains("No Blender version folders"));
    }

    #[test]
    fn version_folder_parsing() {
        assert_eq!(parse_version_folder("4.2"), Some((4, 2, 0)));
        assert_eq!(parse_version_folder("3.6.1"), Some((3, 6, 1)));
        assert_eq!(parse_version_folder("4"), Some((4, 0, 0)));
        assert_eq!(parse_version_folder("notes"), None);
        assert_eq!(parse_version_folder("4.x"), None);
    }

    #[test]
    fn version_is_detected_from_explicit_target_path() {
        let path = Path::new("/home/user/.config/blender/4.2/scripts/addons");
        assert_eq!(detect_version_from_path(path), Some("4.2".to_string()));

        let no_version = Path::new("/tmp/somewhere/else");
        assert_eq!(detect_version_from_path(no_version), None);
    }
}
