use std::time::Duration;

use serde_json::Value;

use crate::blender::{
    self, AddonInstallOutcome, BlenderCommand, CommandResult, InstallationScan, SetupReport,
    SocketStatus, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEND_TIMEOUT, PING_TIMEOUT,
};
use crate::utils::path::normalize_input_path;

/// Marge ajoutée au délai socket pour borner la tâche bloquante elle-même.
const TASK_SLACK: Duration = Duration::from_secs(20);

/// Exécute un travail bloquant hors du thread de l'UI, borné par un budget.
/// Le `fallback` fournit le résultat rendu si le budget expire.
async fn run_bounded<T, F, D>(budget: Duration, task: F, fallback: D) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
    D: FnOnce() -> T,
{
    match tokio::time::timeout(budget, tokio::task::spawn_blocking(task)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("Task failed: {e}")),
        Err(_) => Ok(fallback()),
    }
}

#[tauri::command]
pub fn healthcheck() -> &'static str {
    "ok"
}

/// Scanne les emplacements d'installation Blender conventionnels.
#[tauri::command]
pub fn detect_blender_installation() -> InstallationScan {
    blender::probe_installation()
}

/// Installe l'addon de contrôle, vers une cible explicite ou la destination
/// conventionnelle par défaut.
#[tauri::command]
pub fn install_blender_addon(target_dir: Option<String>) -> AddonInstallOutcome {
    let normalized = target_dir.as_deref().map(normalize_input_path);
    blender::install_addon(normalized.as_deref())
}

/// Teste la joignabilité du socket de contrôle de l'addon.
#[tauri::command]
pub async fn check_blender_socket(
    host: Option<String>,
    port: Option<u16>,
) -> Result<SocketStatus, String> {
    let host = host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port.unwrap_or(DEFAULT_PORT);

    let fallback_host = host.clone();
    run_bounded(
        PING_TIMEOUT + TASK_SLACK,
        move || blender::ping(&host, port, PING_TIMEOUT),
        move || SocketStatus {
            connected: false,
            host: fallback_host,
            port,
            message: "Socket check timed out.".to_string(),
        },
    )
    .await
}

/// Envoie un verbe arbitraire du protocole de l'addon. Le jeu de verbes est un
/// contrat externe fixe; cette commande le transmet sans le réinterpréter.
#[tauri::command]
pub async fn send_blender_command(
    command_type: String,
    params: Option<Value>,
    host: Option<String>,
    port: Option<u16>,
    timeout_ms: Option<u64>,
) -> Result<CommandResult, String> {
    let host = host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port.unwrap_or(DEFAULT_PORT);
    let timeout = timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SEND_TIMEOUT);
    let command = BlenderCommand::new(command_type, params.unwrap_or(Value::Object(Default::default())));

    run_bounded(
        timeout + TASK_SLACK,
        move || blender::send_command(&command, &host, port, timeout),
        || CommandResult {
            ok: false,
            message: "Command timed out before the addon replied.".to_string(),
            result: None,
        },
    )
    .await
}

/// Enveloppe un script généré dans `execute_code` et l'envoie à l'addon.
#[tauri::command]
pub async fn execute_blender_code(
    code: String,
    host: Option<String>,
    port: Option<u16>,
) -> Result<CommandResult, String> {
    let host = host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port.unwrap_or(DEFAULT_PORT);

    run_bounded(
        DEFAULT_SEND_TIMEOUT + TASK_SLACK,
        move || blender::execute_code(&code, &host, port),
        || CommandResult {
            ok: false,
            message: "Command timed out before the addon replied.".to_string(),
            result: None,
        },
    )
    .await
}

/// Setup en un clic: scan, installation de l'addon, health check socket.
#[tauri::command]
pub async fn run_blender_setup() -> Result<SetupReport, String> {
    run_bounded(
        Duration::from_secs(60),
        blender::run_setup,
        || SetupReport {
            executable_path: None,
            addon_path: None,
            detected_version: None,
            socket_status: SocketStatus {
                connected: false,
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                message: "Setup timed out.".to_string(),
            },
            message: "Setup timed out.".to_string(),
            details: vec!["Setup timed out before completing all stages".to_string()],
        },
    )
    .await
}
