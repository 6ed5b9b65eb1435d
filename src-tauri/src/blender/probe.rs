use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::InstallationScan;

/// Nom de l'exécutable Blender sur la plateforme courante.
fn executable_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "blender.exe"
    } else if cfg!(target_os = "macos") {
        "Blender"
    } else {
        "blender"
    }
}

/// Retourne la liste ordonnée des racines candidates d'installation Blender.
fn installation_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "windows")]
    {
        if let Some(program_files) = std::env::var_os("PROGRAMFILES") {
            roots.push(PathBuf::from(program_files).join("Blender Foundation"));
        }
        if let Some(program_files_x86) = std::env::var_os("PROGRAMFILES(X86)") {
            roots.push(PathBuf::from(program_files_x86).join("Blender Foundation"));
        }
        if let Some(local_app_data) = std::env::var_os("LOCALAPPDATA") {
            roots.push(
                PathBuf::from(local_app_data)
                    .join("Programs")
                    .join("Blender Foundation"),
            );
        }

        // Chemins fixes usuels, au cas où les variables d'environnement manquent.
        roots.push(PathBuf::from(r"C:\Program Files\Blender Foundation"));
        roots.push(PathBuf::from(r"C:\Program Files (x86)\Blender Foundation"));
    }

    #[cfg(target_os = "macos")]
    {
        roots.push(PathBuf::from("/Applications/Blender.app/Contents/MacOS"));
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join("Applications/Blender.app/Contents/MacOS"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        roots.push(PathBuf::from("/usr/bin"));
        roots.push(PathBuf::from("/usr/local/bin"));
        roots.push(PathBuf::from("/snap/blender/current"));
        roots.push(PathBuf::from("/opt/blender"));
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".local/share/flatpak/exports/bin"));
        }
    }

    roots
}

/// Supprime les racines dupliquées en conservant l'ordre.
fn dedupe_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();
    for root in roots {
        let key = root.to_string_lossy().to_ascii_lowercase();
        if seen.insert(key) {
            deduped.push(root);
        }
    }
    deduped
}

/// Cherche l'exécutable directement sous une racine puis dans ses sous-dossiers
/// versionnés, jusqu'à deux niveaux. Une racine illisible vaut "pas trouvé ici".
fn find_executable_in_root(root: &Path, exe_name: &str) -> Option<PathBuf> {
    let direct = root.join(exe_name);
    if direct.is_file() {
        return Some(direct);
    }

    let entries = fs::read_dir(root).ok()?;
    let mut first_level_dirs: Vec<PathBuf> = Vec::new();

    for entry in entries.flatten() {
        let candidate = entry.path();
        if !candidate.is_dir() {
            continue;
        }

        let nested = candidate.join(exe_name);
        if nested.is_file() {
            return Some(nested);
        }
        first_level_dirs.push(candidate);
    }

    for dir in first_level_dirs {
        let Ok(sub_entries) = fs::read_dir(dir) else {
            continue;
        };
        for sub_entry in sub_entries.flatten() {
            let sub_path = sub_entry.path();
            if !sub_path.is_dir() {
                continue;
            }
            let exe = sub_path.join(exe_name);
            if exe.is_file() {
                return Some(exe);
            }
        }
    }

    None
}

/// Parcourt les racines dans l'ordre et s'arrête à la première correspondance.
/// Les chemins examinés sont conservés, y compris celui de la correspondance.
fn scan_roots(roots: &[PathBuf], exe_name: &str) -> InstallationScan {
    let mut searched_paths: Vec<String> = Vec::new();

    for root in roots {
        searched_paths.push(root.to_string_lossy().to_string());

        if let Some(exe_path) = find_executable_in_root(root, exe_name) {
            return InstallationScan {
                found: true,
                executable_path: Some(exe_path.to_string_lossy().to_string()),
                searched_paths,
                message: "Blender installation detected.".to_string(),
            };
        }
    }

    InstallationScan {
        found: false,
        executable_path: None,
        searched_paths,
        message: "Blender was not found in common installation paths.".to_string(),
    }
}

/// Scanne les emplacements conventionnels de la plateforme. L'absence d'une
/// installation est un résultat normal, pas une erreur.
pub fn probe_installation() -> InstallationScan {
    let roots = dedupe_roots(installation_roots());
    let scan = scan_roots(&roots, executable_name());

    match scan.executable_path.as_deref() {
        Some(path) => log::info!("Blender executable found at {path}"),
        None => log::info!(
            "No Blender executable found ({} locations searched)",
            scan.searched_paths.len()
        ),
    }

    scan
}
