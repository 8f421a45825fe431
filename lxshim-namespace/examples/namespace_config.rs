//! Resolve the namespaces of an OCI spec into LXC config items
//!
//! Usage: cargo run -p lxshim-namespace --example namespace_config [config.json]

use lxshim_core::{ConfigMap, ContainerSpec, NamespaceKind, NamespaceRequest};
use lxshim_namespace::{NamespaceRegistry, NamespaceTranslator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("debug").init();

    let spec = match std::env::args().nth(1) {
        Some(path) => ContainerSpec::load(path)?,
        None => {
            let mut spec = ContainerSpec::default();
            spec.linux.namespaces = vec![
                NamespaceRequest::clone_new(NamespaceKind::Pid),
                NamespaceRequest::clone_new(NamespaceKind::Mount),
                NamespaceRequest::join(NamespaceKind::Network, "/var/run/netns/demo"),
            ];
            spec
        }
    };

    let registry = NamespaceRegistry::new();
    let translator = NamespaceTranslator::new(&registry);

    let flags = translator.clone_flags(spec.namespaces())?;
    println!("clone flags: {flags:?}");

    let mut config = ConfigMap::new();
    translator.configure(spec.namespaces(), &mut config)?;
    print!("{config}");

    Ok(())
}
