//! Integration test crate for vidbuf.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the vidbuf crates to verify they work together.

/// Route `tracing` output to the test harness. `RUST_LOG` selects the
/// level, e.g. `RUST_LOG=vidbuf_core=trace`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod refcount;

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod bridge;
