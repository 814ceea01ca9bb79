//! Runtime knobs of the headless runner

use crate::controller::event_collector::CollectorSettings;
use crate::mapping::Preferences;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Settings of the poll loop
///
/// ```rust
/// use padnav::config::RunnerSettings;
/// use std::time::Duration;
///
/// // Slower polling for a remote session
/// let settings = RunnerSettings {
///     tick_interval: Duration::from_millis(33),
///     ..RunnerSettings::default()
/// };
/// assert!(settings.mode_file.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct RunnerSettings {
    /// Time between two engine ticks, 60 Hz by default
    pub tick_interval: Duration,

    /// Pause between gamepad searches while none is connected
    pub rediscovery_interval: Duration,

    /// Mode file, the per-user default when unset
    pub mode_file: Option<PathBuf>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_micros(16_667),
            rediscovery_interval: Duration::from_secs(1),
            mode_file: None,
        }
    }
}

impl RunnerSettings {
    /// Defaults, with the mode file taken from the first argument if given
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mode_file = args.into_iter().next().map(PathBuf::from);
        if let Some(path) = &mode_file {
            debug!("Mode file from command line: {}", path.display());
        }
        Self {
            mode_file,
            ..Self::default()
        }
    }

    pub fn mode_file_path(&self) -> Option<PathBuf> {
        self.mode_file.clone().or_else(Preferences::default_path)
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            rediscovery_interval: self.rediscovery_interval,
        }
    }
}
