//! The dispatcher: validates caller input and drives a [`Platform`].
//!
//! A `Robot` owns everything the original global state held: pacing delays,
//! the resource coordinator and the held mouse buttons. Input injection
//! (`input.rs`) goes straight to the platform; display reads (`screen.rs`)
//! pass through the coordinator first.

mod input;
mod screen;

use crate::config::Settings;
use crate::coordinator::{ResourceCoordinator, ResourceState, TeardownOutcome};
use crate::error::{ArgumentError, Error, Result};
use crate::platform::Platform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{info, warn};

/// Blocking sleep used for pacing. Replaceable so tests can record pauses.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

pub struct Robot<P: Platform> {
    platform: P,
    settings: Settings,
    coordinator: Arc<ResourceCoordinator>,
    mouse_delay_ms: AtomicU64,
    keyboard_delay_ms: AtomicU64,
    /// Bitset of `MouseButton::bit` for buttons we pressed and not released.
    pressed: AtomicU8,
    sleeper: Sleeper,
    rng: Mutex<StdRng>,
}

impl<P: Platform> Robot<P> {
    /// Build a robot and probe the display once.
    pub fn new(platform: P, settings: Settings) -> Self {
        let coordinator = Arc::new(ResourceCoordinator::new(
            settings.resources.teardown_timeout(),
            settings.resources.poll_interval(),
        ));
        if let Some(name) = settings.x_display_name.as_deref() {
            if let Err(e) = platform.set_x_display_name(name) {
                warn!(name, error = %e, "Failed to select X display");
            }
        }
        let state = coordinator.initialize(platform.probe_display());
        info!(?state, "robot initialized");

        Self {
            mouse_delay_ms: AtomicU64::new(settings.input.mouse_delay_ms),
            keyboard_delay_ms: AtomicU64::new(settings.input.keyboard_delay_ms),
            platform,
            settings,
            coordinator,
            pressed: AtomicU8::new(0),
            sleeper: Arc::new(std::thread::sleep),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the pacing sleep.
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Seed the jitter source, making smooth moves reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        *self.lock_rng() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared handle for a host teardown hook running on another thread.
    pub fn coordinator(&self) -> Arc<ResourceCoordinator> {
        Arc::clone(&self.coordinator)
    }

    pub fn is_resources_valid(&self) -> bool {
        self.coordinator.is_valid()
    }

    pub fn resource_state(&self) -> ResourceState {
        self.coordinator.state()
    }

    /// Run the teardown hook: refuse new display work and wait for running
    /// operations to drain.
    pub fn shutdown(&self) -> TeardownOutcome {
        self.coordinator.teardown()
    }

    pub fn set_mouse_delay(&self, ms: u64) {
        self.mouse_delay_ms.store(ms, Ordering::Relaxed);
    }

    pub fn set_keyboard_delay(&self, ms: u64) {
        self.keyboard_delay_ms.store(ms, Ordering::Relaxed);
    }

    pub fn mouse_delay(&self) -> Duration {
        Duration::from_millis(self.mouse_delay_ms.load(Ordering::Relaxed))
    }

    pub fn keyboard_delay(&self) -> Duration {
        Duration::from_millis(self.keyboard_delay_ms.load(Ordering::Relaxed))
    }

    /// Crate version string.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Ask the platform to re-read display metrics.
    pub fn update_screen_metrics(&self) -> Result<()> {
        self.platform.refresh_metrics()?;
        Ok(())
    }

    /// Name of the X display the platform talks to.
    pub fn x_display_name(&self) -> Result<String> {
        Ok(self.platform.x_display_name()?)
    }

    /// Switch to another X display, e.g. `":1"`.
    pub fn set_x_display_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ArgumentError::Invalid {
                name: "displayName",
                reason: "empty display name".into(),
            }
            .into());
        }
        self.platform.set_x_display_name(name)?;
        info!(name, "X display selected");
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            (self.sleeper)(duration);
        }
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Enter a coordinator-gated operation.
    fn gate(&self) -> Result<crate::coordinator::OperationGuard<'_>> {
        self.coordinator.begin().map_err(Error::ResourceUnavailable)
    }
}
