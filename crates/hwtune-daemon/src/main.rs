//! hwtune daemon entry point.
//!
//! Loads (or first-run creates) the settings and custom-profile documents,
//! builds the in-memory registry, and parks until shutdown. Hardware
//! application of the tunables is handled by separate backends; this binary
//! owns the durable configuration.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hwtune_core::Settings;
use hwtune_daemon::application::manage_profiles::ProfileRegistry;
use hwtune_daemon::infrastructure::storage::config::{ConfigStore, StoreError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("hwtune daemon starting");

    let store = ConfigStore::at_default_location()?;

    // First run: the store reports NotFound and the daemon writes defaults.
    let settings = match store.read_settings(None) {
        Ok(settings) => settings,
        Err(StoreError::NotFound { .. }) => {
            let settings = Settings::default();
            store.write_settings(&settings, None)?;
            info!(
                "created default settings at {}",
                store.settings_path().display()
            );
            settings
        }
        Err(e) => return Err(e.into()),
    };

    let customs = match store.read_profiles(None) {
        Ok(profiles) => profiles,
        Err(StoreError::NotFound { .. }) => {
            store.write_profiles(&[], None)?;
            info!(
                "created empty profiles document at {}",
                store.profiles_path().display()
            );
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let registry = ProfileRegistry::with_customs(customs);
    info!(
        "loaded {} built-in and {} custom profiles; active profile '{}'",
        registry.builtins().len(),
        registry.customs().len(),
        settings.active_profile_name
    );
    for (state, profile_id) in &settings.state_map {
        match registry.get(*profile_id) {
            Some(profile) => info!("state '{state}' assigned to profile '{}'", profile.name),
            None => warn!("state '{state}' references unknown profile {profile_id}"),
        }
    }

    info!("hwtune daemon ready.  Press Ctrl-C to exit.");
    tokio::signal::ctrl_c().await?;
    info!("hwtune daemon stopped");
    Ok(())
}
