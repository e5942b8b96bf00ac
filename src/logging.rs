//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging. `RUST_LOG` wins over the default filter.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env = Env::default().default_filter_or(default_filter);
    // A second init (tests, embedding hosts) is not an error worth surfacing.
    let _ = env_logger::Builder::from_env(env).try_init();
}
