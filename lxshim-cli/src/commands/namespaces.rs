//! Namespaces command implementation

use anyhow::{Context, Result};
use lxshim_core::{ConfigMap, ContainerSpec};
use lxshim_namespace::{NamespaceRegistry, NamespaceTranslator};
use std::path::Path;
use tracing::debug;

pub fn execute(spec_path: &Path) -> Result<()> {
    let spec = ContainerSpec::load(spec_path)
        .with_context(|| format!("Failed to load spec {}", spec_path.display()))?;

    let registry = NamespaceRegistry::new();
    let translator = NamespaceTranslator::new(&registry);

    let mut config = ConfigMap::new();
    translator
        .configure(spec.namespaces(), &mut config)
        .context("Invalid namespace configuration")?;

    // Only namespaces that are created contribute clone flags
    let cloned: Vec<_> = spec
        .namespaces()
        .iter()
        .filter(|ns| ns.foreign_path().is_none())
        .cloned()
        .collect();
    let flags = translator.clone_flags(&cloned)?;
    debug!(flags = ?flags, "Resolved clone flags");

    println!("clone flags: {:#010x}", flags.bits());
    print!("{config}");

    Ok(())
}
