use crate::cli::Commands;
use anyhow::Result;

pub mod devices;
pub mod hostname;
pub mod namespaces;
pub mod probe;

/// Dispatch command to appropriate handler
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Namespaces { spec } => namespaces::execute(&spec),

        Commands::Devices { spec, output, json } => devices::execute(&spec, output.as_deref(), json),

        Commands::ShowDevices { table } => devices::show(&table),

        Commands::SetHostname { ns_path, hostname } => hostname::execute(ns_path, hostname).await,

        Commands::Probe { pid } => probe::execute(pid),
    }
}
