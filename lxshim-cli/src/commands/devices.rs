//! Device commands implementation

use anyhow::{Context, Result};
use lxshim_cgroup::{ensure_default_devices, read_devices, write_devices};
use lxshim_core::ContainerSpec;
use std::path::Path;

pub fn execute(spec_path: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let mut spec = ContainerSpec::load(spec_path)
        .with_context(|| format!("Failed to load spec {}", spec_path.display()))?;

    ensure_default_devices(&mut spec).context("Failed to add default devices")?;

    if let Some(output) = output {
        write_devices(output, &spec).context("Failed to write device table")?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    for rule in spec.device_rules() {
        let verb = if rule.allow { "allow" } else { "deny" };
        println!("{verb} {rule}");
    }

    Ok(())
}

pub fn show(table: &Path) -> Result<()> {
    let entries = read_devices(table)
        .with_context(|| format!("Failed to read device table {}", table.display()))?;

    for entry in entries {
        println!("{entry}");
    }

    Ok(())
}
