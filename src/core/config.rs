use thiserror::Error;

pub const TOPIC_ARN_VAR: &str = "SNS_TOPIC_ARN";
pub const DAYS_VAR: &str = "DAYS_TO_CHECK";

const DEFAULT_DAYS: u32 = 7;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DAYS_TO_CHECK must be a whole number of days (at least 1), got {0:?}")]
    InvalidDays(String),
}

/// Invocation configuration, read from the environment.
///
/// The topic ARN stays optional here: its absence is reported by the
/// handler as an invocation failure, not a startup panic.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub topic_arn: Option<String>,
    pub days: u32,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(TOPIC_ARN_VAR).ok(),
            std::env::var(DAYS_VAR).ok(),
        )
    }

    fn from_values(
        topic_arn: Option<String>,
        days_raw: Option<String>,
    ) -> Result<Self, ConfigError> {
        let topic_arn = topic_arn.filter(|arn| !arn.trim().is_empty());

        let days = match days_raw {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(days) if days >= 1 => days,
                _ => return Err(ConfigError::InvalidDays(raw)),
            },
            None => DEFAULT_DAYS,
        };

        Ok(Self { topic_arn, days })
    }
}
