//! Schedule configuration: local timezone, working hours and session timing.

use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone name, e.g. `Europe/Moscow`
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// First local hour at which a session may be started
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,

    /// Local hour from which starting is refused
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,

    #[serde(default = "default_reaper_interval")]
    pub reaper_interval_secs: u64,

    /// Age after which the reaper completes an open session
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,

    /// Age after which startup recovery completes an open session
    #[serde(default = "default_recovery_after")]
    pub recovery_after_secs: u64,
}

impl ScheduleConfig {
    /// Parsed timezone.
    pub fn timezone(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ValidationError::InvalidTimezone(self.timezone.clone()))
    }

    /// Whether `hour` (0-23, local) falls inside working hours.
    pub fn is_working_hour(&self, hour: u32) -> bool {
        hour >= self.work_start_hour && hour < self.work_end_hour
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn recovery_after(&self) -> Duration {
        Duration::from_secs(self.recovery_after_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.timezone()?;
        if self.work_start_hour >= self.work_end_hour || self.work_end_hour > 24 {
            return Err(ValidationError::InvalidWorkingHours);
        }
        if self.reaper_interval_secs == 0 {
            return Err(ValidationError::InvalidDuration("reaper_interval_secs"));
        }
        if self.stale_after_secs == 0 {
            return Err(ValidationError::InvalidDuration("stale_after_secs"));
        }
        if self.recovery_after_secs < self.stale_after_secs {
            return Err(ValidationError::InvalidDuration("recovery_after_secs"));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            reaper_interval_secs: default_reaper_interval(),
            stale_after_secs: default_stale_after(),
            recovery_after_secs: default_recovery_after(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_work_start_hour() -> u32 {
    9
}

fn default_work_end_hour() -> u32 {
    23
}

fn default_reaper_interval() -> u64 {
    60
}

fn default_stale_after() -> u64 {
    15 * 60
}

fn default_recovery_after() -> u64 {
    60 * 60
}
