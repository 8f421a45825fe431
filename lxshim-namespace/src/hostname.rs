//! Hostname setting inside a shared UTS namespace
//!
//! The backend only sets the hostname of UTS namespaces it creates. When a
//! container joins an existing UTS namespace the hostname is set here, by
//! switching a thread into that namespace with setns(2).
//!
//! setns(2) changes the namespace of the calling thread only, so the switch,
//! the sethostname(2) call and the switch back must all happen on one thread
//! that runs nothing else in between.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;

use lxshim_core::{Error, Result};
use nix::sched::{setns, CloneFlags};
use nix::unistd::sethostname;
use tracing::{debug, error, info, warn};

/// UTS namespace handle of the calling thread
pub const THREAD_UTS_NAMESPACE: &str = "/proc/thread-self/ns/uts";

const WORKER_NAME: &str = "lxshim-uts";

/// Switches the calling thread back to its original UTS namespace on drop
struct UtsRestoreGuard {
    original: File,
}

impl Drop for UtsRestoreGuard {
    fn drop(&mut self) {
        if let Err(e) = setns(&self.original, CloneFlags::CLONE_NEWUTS) {
            warn!(error = %e, "Failed to restore original UTS namespace");
        } else {
            debug!("Restored original UTS namespace");
        }
    }
}

fn open_namespace(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to open namespace");
        Error::NamespaceOpen {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Set `hostname` in the UTS namespace at `ns_path` from the calling thread
///
/// The caller must own the thread for the duration of the call: nothing else
/// may run on it while it is switched. [`set_hostname`] takes care of that by
/// using a dedicated thread.
///
/// The thread is switched back to its original namespace on every path once
/// both handles are open, including when sethostname(2) fails. A failed
/// switch back is logged and not reported.
///
/// # Errors
/// Returns [`Error::NamespaceOpen`] if either namespace handle cannot be opened,
/// [`Error::NamespaceSwitch`] if setns(2) fails and [`Error::HostnameSet`]
/// if sethostname(2) fails
pub fn set_hostname_in_current_thread(ns_path: &Path, hostname: &str) -> Result<()> {
    let target = open_namespace(ns_path)?;
    let original = open_namespace(Path::new(THREAD_UTS_NAMESPACE))?;

    let _restore = UtsRestoreGuard { original };

    setns(&target, CloneFlags::CLONE_NEWUTS).map_err(|source| {
        error!(path = %ns_path.display(), error = %source, "Failed to switch UTS namespace");
        Error::NamespaceSwitch {
            path: ns_path.to_path_buf(),
            source,
        }
    })?;

    sethostname(hostname).map_err(|source| {
        error!(hostname = %hostname, error = %source, "Failed to set hostname");
        Error::HostnameSet {
            hostname: hostname.to_string(),
            source,
        }
    })?;

    info!(path = %ns_path.display(), hostname = %hostname, "Hostname set in shared UTS namespace");
    Ok(())
}

/// Set `hostname` in the UTS namespace at `ns_path`
///
/// Runs on a freshly spawned thread that exits afterwards, so the calling
/// thread never changes namespace and a failed restore cannot leak into
/// other work.
///
/// # Errors
/// Same as [`set_hostname_in_current_thread`], plus [`Error::Io`] if the
/// thread cannot be spawned
pub fn set_hostname(ns_path: impl AsRef<Path>, hostname: &str) -> Result<()> {
    let ns_path = ns_path.as_ref();

    thread::scope(|scope| -> Result<()> {
        thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn_scoped(scope, move || set_hostname_in_current_thread(ns_path, hostname))?
            .join()
            .map_err(|_| worker_lost())?
    })
}

/// Async variant of [`set_hostname`]
///
/// The work still happens on a dedicated OS thread, never on a runtime
/// worker thread.
///
/// # Errors
/// Same as [`set_hostname`]
pub async fn set_hostname_async(ns_path: PathBuf, hostname: String) -> Result<()> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            let _ = tx.send(set_hostname_in_current_thread(&ns_path, &hostname));
        })?;

    rx.await.map_err(|_| worker_lost())?
}

fn worker_lost() -> Error {
    Error::Namespace {
        message: "hostname worker thread exited without a result".to_string(),
    }
}
