//! Entrypoint de la bibliothèque Tauri Blender AI.
//!
//! Cette unité reste volontairement mince: elle déclare les modules de domaine
//! puis délègue l'exécution à `app::run()`.

mod app;
mod blender;
mod commands;
mod utils;

/// Lance l'application Tauri.
pub fn run() {
    app::run();
}
