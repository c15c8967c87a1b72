//! Shared helpers for GPIO tests.

use gpiomem_core::GpioConfig;


/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default configuration with retry delays removed.
pub fn test_config() -> GpioConfig {
    init_tracing();
    GpioConfig {
        config_retries: 3,
        retry_delay_ms: 0,
        ..GpioConfig::default()
    }
}
