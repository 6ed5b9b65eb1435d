/// Commandes IPC du pont Blender (scan, addon, socket, setup).
pub mod bridge;
