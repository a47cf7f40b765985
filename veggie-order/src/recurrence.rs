use chrono::{DateTime, Days, Months, Utc};
use std::fmt;
use std::str::FromStr;
use veggie_core::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        };
        f.write_str(token)
    }
}

/// Parsed form of `FREQ={DAILY|WEEKLY|MONTHLY};INTERVAL=n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    pub interval: u32,
}

impl RecurrencePattern {
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self { frequency, interval }
    }

    /// The occurrence after `current`. Monthly steps keep the day of month,
    /// clamped to the last day of shorter months.
    pub fn next_after(&self, current: DateTime<Utc>) -> CoreResult<DateTime<Utc>> {
        let next = match self.frequency {
            Frequency::Daily => current.checked_add_days(Days::new(u64::from(self.interval))),
            Frequency::Weekly => current.checked_add_days(Days::new(7 * u64::from(self.interval))),
            Frequency::Monthly => current.checked_add_months(Months::new(self.interval)),
        };

        next.ok_or_else(|| {
            CoreError::ValidationError(format!("Next occurrence of {} after {} is out of range", self, current))
        })
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={};INTERVAL={}", self.frequency, self.interval)
    }
}

impl FromStr for RecurrencePattern {
    type Err = CoreError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidPattern(format!("{} in '{}'", reason, pattern));

        let mut frequency = None;
        let mut interval = None;

        for part in pattern.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid("expected KEY=VALUE"))?;

            match key.trim() {
                "FREQ" if frequency.is_none() => {
                    frequency = Some(match value.trim() {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        _ => return Err(invalid("unknown frequency")),
                    });
                }
                "INTERVAL" if interval.is_none() => {
                    let n: u32 = value
                        .trim()
                        .parse()
                        .map_err(|_| invalid("interval is not a number"))?;
                    if n == 0 {
                        return Err(invalid("interval must be positive"));
                    }
                    interval = Some(n);
                }
                "FREQ" | "INTERVAL" => return Err(invalid("duplicate key")),
                _ => return Err(invalid("unknown key")),
            }
        }

        match (frequency, interval) {
            (Some(frequency), Some(interval)) => Ok(Self { frequency, interval }),
            (None, _) => Err(invalid("missing FREQ")),
            (_, None) => Err(invalid("missing INTERVAL")),
        }
    }
}

/// Next occurrence of `pattern` after `current`
pub fn next_date(current: DateTime<Utc>, pattern: &str) -> CoreResult<DateTime<Utc>> {
    pattern.parse::<RecurrencePattern>()?.next_after(current)
}
