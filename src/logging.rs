//! Logging setup and named loggers.
//!
//! [`init`] installs the global `tracing` subscriber once per process.
//! [`logger`] hands out [`Logger`] handles from a lazily populated registry,
//! so every component asking for the same name shares one instance. Routine
//! events go straight through the `tracing` macros with structured fields.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, Once};

use tracing_subscriber::EnvFilter;

/// Name used when no logger name is given.
pub const ROOT_LOGGER: &str = "vidresolve";

static INIT: Once = Once::new();

static REGISTRY: LazyLock<Mutex<HashMap<String, Logger>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` for this crate
/// when `verbose`. Calls after the first are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default_directive = if verbose {
            format!("info,{ROOT_LOGGER}=debug")
        } else {
            "info".to_string()
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    });
}

/// A named logging handle. Cloning shares the same underlying instance.
#[derive(Debug, Clone)]
pub struct Logger {
    name: Arc<str>,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether both handles come from the same registry entry.
    pub fn same_instance(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
    }

    /// Log an error together with its full cause chain.
    pub fn error(&self, message: &str, error: &anyhow::Error) {
        tracing::error!(logger = %self.name, error = %format!("{error:#}"), "{message}");
    }
}

/// Look up (or create) the logger registered under `name`.
///
/// An empty name maps to [`ROOT_LOGGER`].
pub fn logger(name: &str) -> Logger {
    let name = if name.is_empty() { ROOT_LOGGER } else { name };

    // A poisoned registry still holds valid entries
    let mut registry = REGISTRY
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    registry
        .entry(name.to_string())
        .or_insert_with(|| Logger {
            name: Arc::from(name),
        })
        .clone()
}
