mod addon;
mod probe;
mod setup;
mod socket;
mod types;

pub use addon::{init_resource_dir, install_addon};
pub use probe::probe_installation;
pub use setup::run_setup;
pub use socket::{execute_code, ping, send_command};
pub use types::{
    AddonInstallOutcome, BlenderCommand, CommandResult, InstallationScan, SetupReport,
    SocketStatus, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEND_TIMEOUT, PING_TIMEOUT,
};
