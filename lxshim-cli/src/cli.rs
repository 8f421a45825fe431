//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lxshim")]
#[command(about = "Namespace and device configuration for LXC containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show clone flags and namespace config items for a spec
    Namespaces {
        /// Path to the OCI config.json
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Add default devices to a spec and print the device allow-list
    Devices {
        /// Path to the OCI config.json
        #[arg(short, long)]
        spec: PathBuf,

        /// Write the device table to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the updated spec as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a persisted device table
    ShowDevices {
        /// Device table file
        table: PathBuf,
    },

    /// Set the hostname inside an existing UTS namespace
    SetHostname {
        /// UTS namespace handle, e.g. /proc/<pid>/ns/uts
        #[arg(long = "ns")]
        ns_path: PathBuf,

        /// Hostname to set
        hostname: String,
    },

    /// Show namespace information
    Probe {
        /// Process ID (default: current process)
        #[arg(short, long)]
        pid: Option<u32>,
    },
}
