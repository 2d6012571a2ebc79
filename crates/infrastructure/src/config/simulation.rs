//! Simulation configuration: randomness, acceptable failure rate and
//! incident windows.

use application::{
    ApplicationError, DEFAULT_ACCEPTABLE_FAILURE_PERCENT, EngineSettings, IncidentPlan,
};
use domain::{IncidentKind, IncidentWindow};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, SeqAccess, Unexpected, Visitor},
};

use super::default_true;

/// Incident window override
///
/// With no trigger minutes the window is drawn randomly at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentConfig {
    /// Set to false to never simulate this incident
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Fixed trigger minutes (0-59), one minute or a list
    #[serde(default, deserialize_with = "deserialize_trigger_minutes")]
    pub trigger_minutes: Option<Vec<u8>>,

    /// Fixed duration in minutes; only valid together with trigger minutes
    #[serde(default)]
    pub duration_minutes: Option<u8>,
}

impl Default for IncidentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_minutes: None,
            duration_minutes: None,
        }
    }
}

impl IncidentConfig {
    /// Convert to the engine's startup plan for this window
    pub fn to_plan(&self, kind: IncidentKind) -> Result<IncidentPlan, ApplicationError> {
        if !self.enabled {
            return Ok(IncidentPlan::Disabled);
        }

        match (&self.trigger_minutes, self.duration_minutes) {
            (None, None) => Ok(IncidentPlan::Random),
            (None, Some(_)) => Err(ApplicationError::Configuration(format!(
                "{kind} incident: duration_minutes requires trigger_minutes"
            ))),
            (Some(triggers), duration) => {
                let window = IncidentWindow::new(
                    triggers.clone(),
                    duration.unwrap_or(DEFAULT_FIXED_DURATION_MINUTES),
                )?;
                Ok(IncidentPlan::Fixed(window))
            },
        }
    }
}

/// Accept a single minute or a list of minutes, each a number or a numeric
/// string. Environment variables yield `7` as an integer but `7,8` as a list.
fn deserialize_trigger_minutes<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TriggerMinutesVisitor)
}

struct TriggerMinute(u8);

impl<'de> Deserialize<'de> for TriggerMinute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TriggerMinuteVisitor).map(Self)
    }
}

struct TriggerMinuteVisitor;

impl Visitor<'_> for TriggerMinuteVisitor {
    type Value = u8;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a minute of the hour")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u8, E> {
        u8::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u8, E> {
        u8::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u8, E> {
        value
            .trim()
            .parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
    }
}

struct TriggerMinutesVisitor;

impl<'de> Visitor<'de> for TriggerMinutesVisitor {
    type Value = Option<Vec<u8>>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a minute of the hour or a list of minutes")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        TriggerMinuteVisitor.visit_u64(value).map(|m| Some(vec![m]))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        TriggerMinuteVisitor.visit_i64(value).map(|m| Some(vec![m]))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value
            .split(',')
            .map(|part| TriggerMinuteVisitor.visit_str(part))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut minutes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(TriggerMinute(minute)) = seq.next_element()? {
            minutes.push(minute);
        }
        Ok(Some(minutes))
    }
}

/// Duration used when trigger minutes are fixed but no duration is given
pub const DEFAULT_FIXED_DURATION_MINUTES: u8 = 5;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the process-wide random generator (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Percentage (0-100) of `/acceptable` requests that fail
    #[serde(default = "default_acceptable_failure_percent")]
    pub acceptable_failure_percent: u8,

    /// Latency incident window
    #[serde(default)]
    pub latency_incident: IncidentConfig,

    /// Error incident window
    #[serde(default)]
    pub error_incident: IncidentConfig,
}

const fn default_acceptable_failure_percent() -> u8 {
    DEFAULT_ACCEPTABLE_FAILURE_PERCENT
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            acceptable_failure_percent: default_acceptable_failure_percent(),
            latency_incident: IncidentConfig::default(),
            error_incident: IncidentConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Settings for building the behavior engine
    pub fn engine_settings(&self) -> Result<EngineSettings, ApplicationError> {
        if self.acceptable_failure_percent > 100 {
            return Err(ApplicationError::Configuration(format!(
                "simulation.acceptable_failure_percent must be within 0..=100, got {}",
                self.acceptable_failure_percent
            )));
        }

        Ok(EngineSettings {
            acceptable_failure_percent: self.acceptable_failure_percent,
            seed: self.seed,
            latency_incident: self.latency_incident.to_plan(IncidentKind::Latency)?,
            error_incident: self.error_incident.to_plan(IncidentKind::Error)?,
        })
    }
}
