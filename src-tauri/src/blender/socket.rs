use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde_json::{json, Value};

use super::types::{
    BlenderCommand, CommandResult, SocketStatus, CONNECT_TIMEOUT, DEFAULT_SEND_TIMEOUT,
    EXECUTE_COMMAND_TYPE, PING_COMMAND_TYPE, WRITE_TIMEOUT,
};

/// Traduit une erreur de connexion en cause lisible.
fn describe_connect_error(e: &std::io::Error, host: &str, port: u16) -> String {
    match e.kind() {
        ErrorKind::ConnectionRefused => {
            format!("connection refused at {host}:{port} - start Blender and enable the Blender AI addon")
        }
        ErrorKind::TimedOut => format!(
            "timed out after {} ms connecting to {host}:{port}",
            CONNECT_TIMEOUT.as_millis()
        ),
        _ => format!("Could not connect to Blender socket at {host}:{port}: {e}"),
    }
}

/// Envoie un objet JSON sur une connexion fraîche et lit exactement une
/// réponse JSON. Le cadrage du protocole de l'addon n'a pas de préfixe de
/// longueur: la réponse est accumulée par blocs et parsée incrémentalement
/// jusqu'à obtenir une valeur complète, EOF, ou expiration du délai de lecture.
fn send_raw(host: &str, port: u16, payload: &Value, read_timeout: Duration) -> Result<Value, String> {
    let mut addresses = (host, port)
        .to_socket_addrs()
        .map_err(|e| format!("Unable to resolve {host}:{port}: {e}"))?;
    let address = addresses
        .next()
        .ok_or_else(|| format!("No socket address resolved for {host}:{port}"))?;

    let mut stream = TcpStream::connect_timeout(&address, CONNECT_TIMEOUT)
        .map_err(|e| describe_connect_error(&e, host, port))?;

    stream
        .set_write_timeout(Some(WRITE_TIMEOUT))
        .map_err(|e| format!("Failed to set write timeout: {e}"))?;
    stream
        .set_read_timeout(Some(read_timeout))
        .map_err(|e| format!("Failed to set read timeout: {e}"))?;

    let request_json = payload.to_string();
    stream
        .write_all(request_json.as_bytes())
        .map_err(|e| format!("Failed sending command to Blender socket: {e}"))?;

    let mut all_bytes: Vec<u8> = Vec::new();
    let mut buffer = [0_u8; 8192];
    let mut timed_out = false;

    loop {
        match stream.read(&mut buffer) {
            Ok(0) => break,
            Ok(read_len) => {
                all_bytes.extend_from_slice(&buffer[..read_len]);

                if let Ok(parsed) = serde_json::from_slice::<Value>(&all_bytes) {
                    return validate_addon_response(parsed);
                }
            }
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                timed_out = true;
                break;
            }
            Err(e) => {
                return Err(format!("Failed reading Blender socket response: {e}"));
            }
        }
    }

    if all_bytes.is_empty() {
        if timed_out {
            return Err(format!(
                "timed out after {} ms waiting for the Blender addon response",
                read_timeout.as_millis()
            ));
        }
        return Err(
            "No response received from Blender addon. Make sure the addon server is running."
                .to_string(),
        );
    }

    let parsed = serde_json::from_slice::<Value>(&all_bytes)
        .map_err(|e| format!("Blender response was not valid JSON: {e}"))?;
    validate_addon_response(parsed)
}

/// Rejette les réponses portant le statut d'erreur du protocole de l'addon.
fn validate_addon_response(response: Value) -> Result<Value, String> {
    if response
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status == "error")
    {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown Blender addon error");
        return Err(message.to_string());
    }

    Ok(response)
}

/// Envoie une commande du protocole de l'addon et décode sa réponse. Tout
/// échec (connexion, délai, réponse illisible, erreur addon) est rendu comme
/// `ok=false` avec une cause lisible; aucune nouvelle tentative n'est faite ici.
pub fn send_command(
    command: &BlenderCommand,
    host: &str,
    port: u16,
    timeout: Duration,
) -> CommandResult {
    let payload = json!({
        "type": command.command_type,
        "params": command.params,
    });

    match send_raw(host, port, &payload, timeout) {
        Ok(response) => {
            let message = response
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Command executed by the Blender addon.")
                .to_string();
            let result = response
                .get("result")
                .filter(|value| !value.is_null())
                .cloned();
            CommandResult {
                ok: true,
                message,
                result,
            }
        }
        Err(message) => {
            log::warn!("Blender command '{}' failed: {message}", command.command_type);
            CommandResult {
                ok: false,
                message,
                result: None,
            }
        }
    }
}

/// Teste la joignabilité instantanée du socket de contrôle. Le verbe
/// `get_scene_info` sert de ping car l'addon n'expose pas de verbe dédié.
pub fn ping(host: &str, port: u16, timeout: Duration) -> SocketStatus {
    let ping_request = json!({
        "type": PING_COMMAND_TYPE,
        "params": {},
    });

    match send_raw(host, port, &ping_request, timeout) {
        Ok(_) => SocketStatus {
            connected: true,
            host: host.to_string(),
            port,
            message: "Connected to Blender addon socket.".to_string(),
        },
        Err(e) => SocketStatus {
            connected: false,
            host: host.to_string(),
            port,
            message: format!("Blender socket unavailable: {e}"),
        },
    }
}

/// Enveloppe un script généré dans une commande `execute_code` et l'envoie.
/// Un script vide est refusé avant toute connexion.
pub fn execute_code(code: &str, host: &str, port: u16) -> CommandResult {
    if code.trim().is_empty() {
        return CommandResult {
            ok: false,
            message: "Generated code is empty.".to_string(),
            result: None,
        };
    }

    let command = BlenderCommand::new(EXECUTE_COMMAND_TYPE, json!({ "code": code }));
    send_command(&command, host, port, DEFAULT_SEND_TIMEOUT)
}
