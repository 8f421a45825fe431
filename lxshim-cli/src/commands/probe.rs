//! Probe command implementation

use anyhow::{Context, Result};
use lxshim_namespace::NamespaceInfo;

pub fn execute(pid: Option<u32>) -> Result<()> {
    let target_pid = pid.unwrap_or_else(std::process::id);

    println!("Namespace Information for PID {target_pid}");
    println!("{:-<60}", "");

    let ns_info =
        NamespaceInfo::for_pid(target_pid).context("Failed to get namespace information")?;

    print!("{ns_info}");

    // Check if isolated
    match ns_info.is_isolated() {
        Ok(true) => println!("\nProcess is in isolated namespaces"),
        Ok(false) => println!("\nProcess is in host namespaces"),
        Err(e) => println!("\nFailed to check isolation: {e}"),
    }

    Ok(())
}
