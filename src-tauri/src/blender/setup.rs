use std::path::{Path, PathBuf};

use super::addon::install_addon;
use super::probe::probe_installation;
use super::socket::ping;
use super::types::{
    AddonInstallOutcome, InstallationScan, SetupReport, SocketStatus, DEFAULT_HOST, DEFAULT_PORT,
    PING_TIMEOUT,
};

/// Déduit le répertoire d'addons embarqué d'une installation à partir de
/// l'exécutable détecté: un sous-dossier versionné à côté de l'exécutable
/// (`<dossier>/<version>/scripts/addons`).
fn addon_target_from_executable(executable_path: &str) -> Option<PathBuf> {
    let exe_dir = Path::new(executable_path).parent()?;
    let entries = std::fs::read_dir(exe_dir).ok()?;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let mut parts = name.split('.');
        let is_version = parts.next().is_some_and(|p| p.parse::<u32>().is_ok())
            && parts.next().is_some_and(|p| p.parse::<u32>().is_ok());
        if is_version {
            return Some(path.join("scripts").join("addons"));
        }
    }

    None
}

/// Combine les trois résultats d'étape en un rapport unique. Fonction pure:
/// chaque étape reste testable indépendamment de l'enchaînement.
fn combine(
    scan: InstallationScan,
    install: AddonInstallOutcome,
    socket_status: SocketStatus,
) -> SetupReport {
    let mut details = Vec::with_capacity(3);

    details.push(match scan.executable_path.as_deref() {
        Some(path) => format!("Detected Blender at {path}"),
        None => format!("Blender not detected: {}", scan.message),
    });

    details.push(if install.installed {
        match (install.addon_path.as_deref(), install.detected_version.as_deref()) {
            (Some(path), Some(version)) => {
                format!("Addon installed for Blender {version} at {path}")
            }
            (Some(path), None) => format!("Addon installed at {path}"),
            _ => "Addon installed".to_string(),
        }
    } else {
        format!("Addon install failed: {}", install.message)
    });

    details.push(if socket_status.connected {
        "Socket: connected".to_string()
    } else {
        format!("Socket: {}", socket_status.message)
    });

    let message = socket_status.message.clone();

    SetupReport {
        executable_path: scan.executable_path,
        addon_path: install.addon_path,
        detected_version: install.detected_version,
        socket_status,
        message,
        details,
    }
}

/// Setup en un clic: scan, installation de l'addon, puis health check du
/// socket. Aucune étape n'interrompt les suivantes: chacune est actionnable
/// indépendamment par l'utilisateur (addon déjà installé mais Blender pas
/// encore lancé, par exemple), et chacune laisse une ligne dans `details`.
pub fn run_setup() -> SetupReport {
    let scan = probe_installation();

    // L'installation retombe sur la destination conventionnelle quand le scan
    // n'a rien donné: un échec de détection ne doit pas bloquer l'utilisateur.
    let install = match scan
        .executable_path
        .as_deref()
        .and_then(addon_target_from_executable)
    {
        Some(target) => install_addon(Some(&target)),
        None => install_addon(None),
    };

    let socket_status = ping(DEFAULT_HOST, DEFAULT_PORT, PING_TIMEOUT);

    combine(scan, install, socket_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn failed_ping(message: &str) -> SocketStatus {
        SocketStatus {
            connected: false,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            message: message.to_string(),
        }
    }

    #[test]
    fn probe_failure_does_not_mask_later_stages() {
        let scan = InstallationScan {
            found: false,
            executable_path: None,
            searched_paths: vec!["/opt/blender".to_string()],
            message: "Blender was not found in common installation paths.".to_string(),
        };
        let install = AddonInstallOutcome {
            installed: true,
            addon_path: Some("/home/user/.config/blender/4.2/scripts/addons/blender_ai_addon.py".to_string()),
            detected_version: Some("4.2".to_string()),
            message: "Addon installed".to_string(),
        };
        let status = failed_ping("Blender socket unavailable: connection refused at 127.0.0.1:9876");

        let report = combine(scan, install, status);

        assert_eq!(report.details.len(), 3);
        assert!(!report.socket_status.connected);
        assert_eq!(
            report.message,
            "Blender socket unavailable: connection refused at 127.0.0.1:9876"
        );
        assert!(report.executable_path.is_none());
        assert!(report.addon_path.is_some());
        assert!(report.details[0].contains("not detected"));
        assert!(report.details[1].contains("Addon installed"));
        assert!(report.details[2].starts_with("Socket:"));
    }

    #[test]
    fn all_stages_successful_carry_every_field() {
        let scan = InstallationScan {
            found: true,
            executable_path: Some(r"C:\Program Files\Blender Foundation\Blender 4.2\blender.exe".to_string()),
            searched_paths: vec![r"C:\Program Files\Blender Foundation".to_string()],
            message: "Blender installation detected.".to_string(),
        };
        let install = AddonInstallOutcome {
            installed: true,
            addon_path: Some(r"C:\...\4.2\scripts\addons\blender_ai_addon.py".to_string()),
            detected_version: Some("4.2".to_string()),
            message: "Addon installed".to_string(),
        };
        let status = SocketStatus {
            connected: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            message: "Connected to Blender addon socket.".to_string(),
        };

        let report = combine(scan, install, status);

        assert!(report.executable_path.is_some());
        assert!(report.addon_path.is_some());
        assert!(report.detected_version.is_some());
        assert!(report.socket_status.connected);
        assert_eq!(report.message, "Connected to Blender addon socket.");
        assert_eq!(report.details.len(), 3);
        assert_eq!(report.details[2], "Socket: connected");
    }

    #[test]
    fn every_stage_leaves_exactly_one_detail_line() {
        let scan = InstallationScan {
            found: false,
            executable_path: None,
            searched_paths: Vec::new(),
            message: "nope".to_string(),
        };
        let install = AddonInstallOutcome {
            installed: false,
            addon_path: None,
            detected_version: None,
            message: "missing prerequisite".to_string(),
        };

        let report = combine(scan, install, failed_ping("unreachable"));

        assert_eq!(report.details.len(), 3);
        assert!(report.details[1].contains("missing prerequisite"));
    }

    #[test]
    fn addon_target_is_derived_from_versioned_folder_next_to_executable() {
        let temp = tempfile::tempdir().unwrap();
        let install_dir = temp.path().join("Blender 4.2");
        fs::create_dir_all(install_dir.join("4.2")).unwrap();
        let exe = install_dir.join("blender.exe");
        fs::write(&exe, b"fake").unwrap();

        let target = addon_target_from_executable(&exe.to_string_lossy()).unwrap();
        assert!(target.ends_with(Path::new("4.2/scripts/addons")));
    }

    #[test]
    fn addon_target_requires_a_versioned_folder() {
        let temp = tempfile::tempdir().unwrap();
        let install_dir = temp.path().join("Blender");
        fs::create_dir_all(install_dir.join("docs")).unwrap();
        let exe = install_dir.join("blender.exe");
        fs::write(&exe, b"fake").unwrap();

        assert!(addon_target_from_executable(&exe.to_string_lossy()).is_none());
    }
}
