use crate::commands;

/// Enregistre la liste unique des commandes IPC exposées au frontend.
pub fn register_invoke_handler(builder: tauri::Builder<tauri::Wry>) -> tauri::Builder<tauri::Wry> {
    builder.invoke_handler(tauri::generate_handler![
        commands::bridge::healthcheck,
        commands::bridge::detect_blender_installation,
        commands::bridge::install_blender_addon,
        commands::bridge::check_blender_socket,
        commands::bridge::send_blender_command,
        commands::bridge::execute_blender_code,
        commands::bridge::run_blender_setup
    ])
}
