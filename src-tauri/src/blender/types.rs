use std::time::Duration;

use serde_json::Value;

/// Hôte par défaut du socket de contrôle de l'addon.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Port par défaut du socket de contrôle de l'addon.
pub const DEFAULT_PORT: u16 = 9876;
/// Nom du fichier addon déployé dans Blender.
pub const ADDON_FILE_NAME: &str = "blender_ai_addon.py";
/// Verbe addon utilisé comme ping (contrat externe fixe).
pub const PING_COMMAND_TYPE: &str = "get_scene_info";
/// Verbe addon d'exécution de script (contrat externe fixe).
pub const EXECUTE_COMMAND_TYPE: &str = "execute_code";

/// Délai maximal d'établissement de connexion TCP.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Délai maximal d'écriture de la requête.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
/// Délai de lecture par défaut pour une commande complète.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(20);
/// Délai de lecture réduit pour le simple test de joignabilité.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Résultat d'un scan des emplacements d'installation Blender.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationScan {
    /// Vrai si un exécutable Blender a été trouvé.
    pub found: bool,
    /// Chemin de l'exécutable retenu, uniquement si `found`.
    pub executable_path: Option<String>,
    /// Emplacements examinés, dans l'ordre de parcours.
    pub searched_paths: Vec<String>,
    /// Message de diagnostic lisible.
    pub message: String,
}

/// Résultat d'une tentative d'installation de l'addon de contrôle.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonInstallOutcome {
    /// Vrai si le fichier addon a bien été écrit.
    pub installed: bool,
    /// Chemin de destination de l'addon, si connu.
    pub addon_path: Option<String>,
    /// Version Blender détectée, au mieux.
    pub detected_version: Option<String>,
    /// Message de diagnostic lisible.
    pub message: String,
}

/// État instantané de joignabilité du socket de contrôle.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketStatus {
    /// Vrai si l'addon a répondu sur le socket.
    pub connected: bool,
    /// Hôte testé.
    pub host: String,
    /// Port testé.
    pub port: u16,
    /// Message de diagnostic lisible.
    pub message: String,
}

/// Réponse décodée d'une commande envoyée à l'addon.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Vrai si la commande a abouti côté addon.
    pub ok: bool,
    /// Message de l'addon ou cause d'échec.
    pub message: String,
    /// Payload `result` brut renvoyé par l'addon.
    pub result: Option<Value>,
}

/// Commande au format du protocole de l'addon (contrat externe fixe).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BlenderCommand {
    /// Verbe reconnu par l'addon (`execute_code`, `get_scene_info`, ...).
    #[serde(rename = "type")]
    pub command_type: String,
    /// Paramètres opaques transmis tels quels.
    #[serde(default)]
    pub params: Value,
}

impl BlenderCommand {
    /// Construit une commande pour un verbe donné et ses paramètres.
    pub fn new(command_type: impl Into<String>, params: Value) -> Self {
        Self {
            command_type: command_type.into(),
            params,
        }
    }
}

/// Agrégat d'une exécution du setup en un clic.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    /// Exécutable détecté, si le scan a abouti.
    pub executable_path: Option<String>,
    /// Addon déployé, si l'installation a abouti.
    pub addon_path: Option<String>,
    /// Version Blender détectée pendant l'installation.
    pub detected_version: Option<String>,
    /// Joignabilité du socket au moment du setup.
    pub socket_status: SocketStatus,
    /// Message principal (celui du health check socket).
    pub message: String,
    /// Une ligne lisible par étape tentée, dans l'ordre d'exécution.
    pub details: Vec<String>,
}
