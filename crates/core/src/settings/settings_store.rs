//! Process-wide efficiency defaults.
//!
//! Meant to be set once at startup, before any calculation runs. Every
//! calculation takes a snapshot when its configurer is created, so a later
//! change never affects a run already in flight.

use std::sync::RwLock;

use lazy_static::lazy_static;
use log::{debug, warn};

use super::EfficiencySettings;
use crate::constants::MAX_BENCHMARKS;
use crate::errors::{EfficiencyError, Result};

lazy_static! {
    static ref CURRENT: RwLock<EfficiencySettings> = RwLock::new(EfficiencySettings::default());
}

/// Snapshot of the process-wide settings.
pub fn current() -> EfficiencySettings {
    match CURRENT.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn default_benchmarks() -> Vec<String> {
    current().benchmarks
}

/// Replace the default benchmark list. At most five names are accepted.
pub fn set_default_benchmarks<I, S>(names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if names.len() > MAX_BENCHMARKS {
        return Err(EfficiencyError::TooManyBenchmarks(names.len()).into());
    }

    debug!("Default benchmarks set to {:?}", names);
    write(|settings| settings.benchmarks = names);
    Ok(())
}

impl EfficiencySettings {
    /// Validate and install these settings as the process-wide defaults.
    pub fn apply(self) -> Result<()> {
        self.validate()?;
        debug!("Applying efficiency settings: {:?}", self);
        write(move |settings| *settings = self);
        Ok(())
    }
}

fn write(update: impl FnOnce(&mut EfficiencySettings)) {
    match CURRENT.write() {
        Ok(mut guard) => update(&mut guard),
        Err(poisoned) => {
            warn!("Efficiency settings lock was poisoned; overwriting");
            update(&mut poisoned.into_inner());
        }
    }
}
