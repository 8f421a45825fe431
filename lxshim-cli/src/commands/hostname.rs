//! Set-hostname command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;

pub async fn execute(ns_path: PathBuf, hostname: String) -> Result<()> {
    let display = ns_path.display().to_string();

    lxshim_namespace::set_hostname_async(ns_path, hostname)
        .await
        .with_context(|| format!("Failed to set hostname in {display}"))
}
