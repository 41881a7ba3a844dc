//! Cohort progress and weekly community-call countdowns.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Longest cohort `validate` accepts (ten years).
pub const MAX_COHORT_WEEKS: u32 = 520;

fn default_call_minutes() -> u32 {
    60
}

/// A study cohort meeting once a week for a fixed number of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub name: String,
    #[serde(alias = "startsAt")]
    pub starts_at: DateTime<Utc>,
    pub weeks: u32,
    /// Weekday of the community call (UTC)
    #[serde(alias = "callWeekday")]
    pub call_weekday: Weekday,
    /// Start time of the community call (UTC)
    #[serde(alias = "callTime")]
    pub call_time: NaiveTime,
    #[serde(default = "default_call_minutes", alias = "callMinutes")]
    pub call_minutes: u32,
}

/// Where a cohort stands at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub enum CohortProgress {
    NotStarted { starts_in: Countdown },
    InProgress { week: u32, total_weeks: u32, percent: f64 },
    Finished,
}

/// One weekly call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCall {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl ScheduledCall {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.ends_at
    }
}

impl Cohort {
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |message: &str| DomainError::InvalidCohort {
            name: self.name.clone(),
            message: message.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.weeks == 0 {
            return Err(invalid("weeks must be at least 1"));
        }
        if self.weeks > MAX_COHORT_WEEKS {
            return Err(invalid(&format!("weeks must be at most {MAX_COHORT_WEEKS}")));
        }
        if self.checked_end().is_none() {
            return Err(invalid("cohort ends past the last representable date"));
        }
        if self.call_minutes == 0 {
            return Err(invalid("call_minutes must be at least 1"));
        }
        Ok(())
    }

    /// End of the cohort window, saturating at the last representable instant.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.checked_end().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn checked_end(&self) -> Option<DateTime<Utc>> {
        self.starts_at
            .checked_add_signed(Duration::weeks(i64::from(self.weeks)))
    }

    pub fn progress(&self, now: DateTime<Utc>) -> CohortProgress {
        if now < self.starts_at {
            return CohortProgress::NotStarted {
                starts_in: Countdown::until(self.starts_at, now),
            };
        }
        let end = self.ends_at();
        if now >= end {
            return CohortProgress::Finished;
        }

        let elapsed = now - self.starts_at;
        let total = end - self.starts_at;
        let week = u32::try_from(elapsed.num_days() / 7).unwrap_or(u32::MAX) + 1;
        let percent = elapsed.num_seconds() as f64 / total.num_seconds() as f64 * 100.0;

        CohortProgress::InProgress {
            week: week.min(self.weeks),
            total_weeks: self.weeks,
            percent,
        }
    }

    /// Every weekly call inside the cohort window, in order.
    pub fn calls(&self) -> impl Iterator<Item = ScheduledCall> + '_ {
        let first = self.first_call();
        let end = self.ends_at();
        let length = Duration::minutes(i64::from(self.call_minutes));

        (0..i64::from(self.weeks))
            .map_while(move |week| first?.checked_add_signed(Duration::weeks(week)))
            .take_while(move |start| *start < end)
            .map(move |starts_at| ScheduledCall {
                starts_at,
                ends_at: starts_at
                    .checked_add_signed(length)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            })
    }

    /// The call running at `now`, else the next one; `None` once the last call ended.
    pub fn next_call(&self, now: DateTime<Utc>) -> Option<ScheduledCall> {
        self.calls().find(|call| now < call.ends_at)
    }

    /// Earliest call slot at or after the cohort start; `None` past the calendar's end.
    fn first_call(&self) -> Option<DateTime<Utc>> {
        let start_date = self.starts_at.date_naive();
        let offset = (7 + self.call_weekday.num_days_from_monday()
            - start_date.weekday().num_days_from_monday())
            % 7;
        let candidate = start_date
            .checked_add_days(Days::new(u64::from(offset)))?
            .and_time(self.call_time)
            .and_utc();

        if candidate < self.starts_at {
            candidate.checked_add_signed(Duration::weeks(1))
        } else {
            Some(candidate)
        }
    }
}

/// Remaining time split into display units. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_duration(target - now)
    }

    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
