//! Behavior engine - decides delay and outcome per request
//!
//! The engine holds the immutable simulation configuration (acceptable
//! failure rate and the incident schedule drawn at construction) plus one
//! process-wide random generator seeded exactly once. `evaluate` is the only
//! operation; it never fails.

use std::{fmt, time::Duration};

use chrono::Timelike;
use domain::{
    IncidentSchedule, IncidentStatus, IncidentWindow, MAX_DRAWN_DURATION_MINUTES,
    MIN_DRAWN_DURATION_MINUTES, Outcome, OutcomePolicy, Profile, TRIGGER_MINUTE_SPAN,
    TRIGGERS_PER_WINDOW,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApplicationError;

/// Default failure percentage of the `acceptable` profile
pub const DEFAULT_ACCEPTABLE_FAILURE_PERCENT: u8 = 10;

/// How an incident window is obtained at startup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IncidentPlan {
    /// Drawn from the engine's generator
    #[default]
    Random,
    /// Supplied explicitly
    Fixed(IncidentWindow),
    /// Never active
    Disabled,
}

impl IncidentPlan {
    fn resolve(self, rng: &mut StdRng) -> Result<IncidentWindow, ApplicationError> {
        match self {
            Self::Random => draw_incident_window(rng),
            Self::Fixed(window) => Ok(window),
            Self::Disabled => Ok(IncidentWindow::disabled()),
        }
    }
}

/// Settings the engine is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Percentage (0-100) of `acceptable` requests that fail
    pub acceptable_failure_percent: u8,
    /// Seed for the process-wide generator; drawn from the OS when absent
    pub seed: Option<u64>,
    pub latency_incident: IncidentPlan,
    pub error_incident: IncidentPlan,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            acceptable_failure_percent: DEFAULT_ACCEPTABLE_FAILURE_PERCENT,
            seed: None,
            latency_incident: IncidentPlan::Random,
            error_incident: IncidentPlan::Random,
        }
    }
}

/// Result of evaluating one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub profile: Profile,
    /// Time to wait before answering
    pub delay: Duration,
    pub outcome: Outcome,
    /// Incident windows active at the evaluated instant
    pub incidents: IncidentStatus,
}

impl Evaluation {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn delay_ms(&self) -> u64 {
        self.delay.as_millis() as u64
    }
}

/// Draw a window: distinct trigger minutes from a uniform permutation of
/// `0..59` and a duration in `[1, 10]` minutes.
pub fn draw_incident_window<R: Rng + ?Sized>(
    rng: &mut R,
) -> Result<IncidentWindow, ApplicationError> {
    let mut minutes: Vec<u8> = (0..TRIGGER_MINUTE_SPAN).collect();
    minutes.shuffle(rng);
    minutes.truncate(TRIGGERS_PER_WINDOW);

    let duration = rng.random_range(MIN_DRAWN_DURATION_MINUTES..=MAX_DRAWN_DURATION_MINUTES);

    Ok(IncidentWindow::new(minutes, duration)?)
}

/// Synthetic behavior engine
pub struct BehaviorEngine {
    schedule: IncidentSchedule,
    acceptable_failure_percent: u8,
    rng: Mutex<StdRng>,
}

impl fmt::Debug for BehaviorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorEngine")
            .field("schedule", &self.schedule)
            .field(
                "acceptable_failure_percent",
                &self.acceptable_failure_percent,
            )
            .finish_non_exhaustive()
    }
}

impl BehaviorEngine {
    /// Build the engine, seeding the generator and resolving both windows
    pub fn new(settings: EngineSettings) -> Result<Self, ApplicationError> {
        if settings.acceptable_failure_percent > 100 {
            return Err(ApplicationError::Configuration(format!(
                "acceptable failure percent must be within 0..=100, got {}",
                settings.acceptable_failure_percent
            )));
        }

        let mut rng = settings
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        let latency = settings.latency_incident.resolve(&mut rng)?;
        let error = settings.error_incident.resolve(&mut rng)?;

        debug!(
            latency_incident = %latency,
            error_incident = %error,
            acceptable_failure_percent = settings.acceptable_failure_percent,
            seeded = settings.seed.is_some(),
            "Behavior engine initialized"
        );

        Ok(Self {
            schedule: IncidentSchedule::new(latency, error),
            acceptable_failure_percent: settings.acceptable_failure_percent,
            rng: Mutex::new(rng),
        })
    }

    #[must_use]
    pub const fn schedule(&self) -> &IncidentSchedule {
        &self.schedule
    }

    #[must_use]
    pub const fn acceptable_failure_percent(&self) -> u8 {
        self.acceptable_failure_percent
    }

    /// Decide the delay and outcome for one request of `profile` at `now`
    ///
    /// Only the minute-of-hour of `now` is consulted.
    pub fn evaluate<T: Timelike>(&self, profile: Profile, now: &T) -> Evaluation {
        let incidents = self.schedule.status_at(now);
        let spec = profile.spec();

        if spec.policy == OutcomePolicy::AlwaysNotFound {
            return Evaluation {
                profile,
                delay: Duration::ZERO,
                outcome: Outcome::NotFound,
                incidents,
            };
        }

        let mut rng = self.rng.lock();

        let mut delay_ms = rng.random_range(spec.min_delay_ms..=spec.max_delay_ms);
        if incidents.latency_active {
            delay_ms *= 2;
        }

        let outcome = match spec.policy {
            OutcomePolicy::AlwaysServerError => Outcome::ServerError,
            OutcomePolicy::AlwaysNotFound => Outcome::NotFound,
            OutcomePolicy::SuccessUnlessErrorIncident => {
                if incidents.error_active {
                    Outcome::ServerError
                } else {
                    Outcome::Success
                }
            },
            OutcomePolicy::StochasticFailure => {
                let roll: u8 = rng.random_range(0..100);
                if roll < self.acceptable_failure_percent {
                    Outcome::ServerError
                } else {
                    Outcome::Success
                }
            },
        };
        drop(rng);

        Evaluation {
            profile,
            delay: Duration::from_millis(delay_ms),
            outcome,
            incidents,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    const TRIALS: usize = 10_000;

    fn quiet_engine(seed: u64) -> BehaviorEngine {
        BehaviorEngine::new(EngineSettings {
            seed: Some(seed),
            latency_incident: IncidentPlan::Disabled,
            error_incident: IncidentPlan::Disabled,
            ..Default::default()
        })
        .unwrap()
    }

    fn always_on() -> IncidentWindow {
        // Every minute is within 59 minutes of trigger 0
        IncidentWindow::new(vec![0], 59).unwrap()
    }

    fn engine_with(latency: IncidentPlan, error: IncidentPlan) -> BehaviorEngine {
        BehaviorEngine::new(EngineSettings {
            seed: Some(7),
            latency_incident: latency,
            error_incident: error,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn delays_stay_within_profile_range() {
        let engine = quiet_engine(1);
        for profile in Profile::ALL {
            let spec = profile.spec();
            for minute in (0..TRIALS).map(|i| (i % 60) as u32) {
                let eval = engine.evaluate(profile, &at_minute(minute));
                let ms = eval.delay_ms();
                assert!(
                    (spec.min_delay_ms..=spec.max_delay_ms).contains(&ms),
                    "{profile}: {ms}ms"
                );
            }
        }
    }

    #[test]
    fn latency_incident_doubles_the_range() {
        let engine = engine_with(IncidentPlan::Fixed(always_on()), IncidentPlan::Disabled);
        for profile in Profile::ALL.into_iter().filter(|p| *p != Profile::NotFound) {
            let spec = profile.spec();
            for _ in 0..TRIALS {
                let eval = engine.evaluate(profile, &at_minute(17));
                assert!(eval.incidents.latency_active);
                let ms = eval.delay_ms();
                assert!(
                    (2 * spec.min_delay_ms..=2 * spec.max_delay_ms).contains(&ms),
                    "{profile}: {ms}ms"
                );
            }
        }
    }

    #[test]
    fn notfound_has_zero_delay_and_not_found_outcome() {
        let engine = engine_with(
            IncidentPlan::Fixed(always_on()),
            IncidentPlan::Fixed(always_on()),
        );
        for _ in 0..TRIALS {
            let eval = engine.evaluate(Profile::NotFound, &at_minute(3));
            assert_eq!(eval.delay, Duration::ZERO);
            assert_eq!(eval.outcome, Outcome::NotFound);
        }
    }

    #[test]
    fn err_and_bad_always_fail() {
        let engine = quiet_engine(2);
        for profile in [Profile::Err, Profile::Bad] {
            for _ in 0..TRIALS {
                assert_eq!(
                    engine.evaluate(profile, &at_minute(0)).outcome,
                    Outcome::ServerError
                );
            }
        }
    }

    #[test]
    fn successful_profiles_succeed_outside_error_incident() {
        let engine = quiet_engine(3);
        for profile in [Profile::Good, Profile::Ok, Profile::VerySlow] {
            for _ in 0..1_000 {
                assert_eq!(
                    engine.evaluate(profile, &at_minute(30)).outcome,
                    Outcome::Success
                );
            }
        }
    }

    #[test]
    fn error_incident_fails_successful_profiles_but_still_delays() {
        let window = IncidentWindow::new(vec![10], 5).unwrap();
        let engine = engine_with(IncidentPlan::Disabled, IncidentPlan::Fixed(window));

        for profile in [Profile::Good, Profile::Ok, Profile::VerySlow] {
            let inside = engine.evaluate(profile, &at_minute(12));
            assert_eq!(inside.outcome, Outcome::ServerError);
            assert!(inside.incidents.error_active);
            assert!(inside.delay_ms() >= profile.spec().min_delay_ms);

            let outside = engine.evaluate(profile, &at_minute(16));
            assert_eq!(outside.outcome, Outcome::Success);
        }
    }

    #[test]
    fn acceptable_ignores_error_incident() {
        let engine = BehaviorEngine::new(EngineSettings {
            acceptable_failure_percent: 0,
            seed: Some(4),
            latency_incident: IncidentPlan::Disabled,
            error_incident: IncidentPlan::Fixed(always_on()),
        })
        .unwrap();
        for _ in 0..1_000 {
            assert_eq!(
                engine.evaluate(Profile::Acceptable, &at_minute(5)).outcome,
                Outcome::Success
            );
        }
    }

    #[test]
    fn acceptable_failure_rate_converges() {
        const LARGE_TRIALS: usize = 100_000;
        for percent in [2u8, 10] {
            let engine = BehaviorEngine::new(EngineSettings {
                acceptable_failure_percent: percent,
                seed: Some(5),
                latency_incident: IncidentPlan::Disabled,
                error_incident: IncidentPlan::Disabled,
            })
            .unwrap();

            let failures = (0..LARGE_TRIALS)
                .filter(|_| {
                    engine.evaluate(Profile::Acceptable, &at_minute(0)).outcome
                        == Outcome::ServerError
                })
                .count();

            #[allow(clippy::cast_precision_loss)]
            let rate = failures as f64 / LARGE_TRIALS as f64 * 100.0;
            assert!(
                (rate - f64::from(percent)).abs() < 1.0,
                "expected ~{percent}%, observed {rate:.2}%"
            );
        }
    }

    #[test]
    fn acceptable_extremes() {
        let always = BehaviorEngine::new(EngineSettings {
            acceptable_failure_percent: 100,
            seed: Some(6),
            ..Default::default()
        })
        .unwrap();
        for _ in 0..1_000 {
            assert_eq!(
                always.evaluate(Profile::Acceptable, &at_minute(0)).outcome,
                Outcome::ServerError
            );
        }
    }

    #[test]
    fn rejects_percent_above_one_hundred() {
        let err = BehaviorEngine::new(EngineSettings {
            acceptable_failure_percent: 101,
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn random_windows_are_drawn_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let window = draw_incident_window(&mut rng).unwrap();
            assert_eq!(window.trigger_minutes().len(), TRIGGERS_PER_WINDOW);
            assert!(
                window
                    .trigger_minutes()
                    .iter()
                    .all(|m| *m < TRIGGER_MINUTE_SPAN)
            );
            assert!(
                (MIN_DRAWN_DURATION_MINUTES..=MAX_DRAWN_DURATION_MINUTES)
                    .contains(&window.duration_minutes())
            );
        }
    }

    #[test]
    fn same_seed_draws_same_schedule() {
        let a = BehaviorEngine::new(EngineSettings {
            seed: Some(42),
            ..Default::default()
        })
        .unwrap();
        let b = BehaviorEngine::new(EngineSettings {
            seed: Some(42),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(a.schedule(), b.schedule());
        assert!(!a.schedule().latency.is_disabled());
        assert!(!a.schedule().error.is_disabled());
    }

    #[test]
    fn concurrent_evaluations_do_not_interfere() {
        let engine = Arc::new(quiet_engine(9));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    (0..1_000)
                        .map(|_| engine.evaluate(Profile::Err, &at_minute(0)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            for eval in handle.join().unwrap() {
                assert_eq!(eval.outcome, Outcome::ServerError);
                assert!((200..=400).contains(&eval.delay_ms()));
                total += 1;
            }
        }
        assert_eq!(total, 16_000);
    }

    fn at_minute(minute: u32) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(12, minute, 0).unwrap()
    }
}
