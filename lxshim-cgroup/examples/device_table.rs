//! Add the default devices to an empty spec and persist the device table
//!
//! Usage: cargo run -p lxshim-cgroup --example device_table [output]

use lxshim_cgroup::{ensure_default_devices, read_devices, write_devices, ContainerSpec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/lxshim-devices.txt".to_string());

    let mut spec = ContainerSpec::default();
    ensure_default_devices(&mut spec)?;

    for rule in spec.device_rules() {
        println!("allow {rule}");
    }

    write_devices(&output, &spec)?;

    println!("\n{output}:");
    for entry in read_devices(&output)? {
        println!("  {entry}");
    }

    Ok(())
}
