//! Threshold alert evaluator.
//!
//! Runs on **every incoming reading** and decides which spoken alerts to
//! raise.  Each rule is independent: one reading can fire the moisture
//! alert and a pH alert in the same pass, each gated only by its own
//! cooldown.
//!
//! ## Cooldown lifecycle
//!
//! 1. A rule's metric violates its threshold.
//! 2. If the rule's message was never spoken, or was last spoken at least
//!    the cooldown interval ago, the alert fires and the cooldown table is
//!    stamped with the current time for that message.
//! 3. A rule whose condition clears keeps its stamp; the timer is never
//!    reset early.
//!
//! The cooldown table is keyed by message identity, so two rules that
//! share a message also share a cooldown.

use heapless::{LinearMap, Vec as HVec};
use log::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::reading::{Metric, Reading};

/// Minimum gap between two utterances of the same message (ms).
pub const ALERT_COOLDOWN_MS: i64 = 30_000;

/// Language tag handed to the speech collaborator.
pub const ALERT_LANGUAGE: &str = "te-IN";

/// "Soil moisture is low. Please water."
pub const LOW_MOISTURE_MESSAGE: &str = "మట్టి తేమ తక్కువగా ఉంది. దయచేసి నీళ్ళు పెట్టండి.";
/// "Soil pH is low."
pub const LOW_PH_MESSAGE: &str = "నేల pH తక్కువగా ఉంది.";
/// "Soil pH is high."
pub const HIGH_PH_MESSAGE: &str = "నేల pH ఎక్కువగా ఉంది.";

/// Upper bound on configured rules (and distinct cooldown keys).
pub const MAX_RULES: usize = 8;

// ───────────────────────────────────────────────────────────────
// Rules
// ───────────────────────────────────────────────────────────────

/// Which side of the threshold is a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Violated when `value < threshold`.
    Below,
    /// Violated when `value > threshold`.
    Above,
}

impl Direction {
    pub fn violated(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Below => value < threshold,
            Self::Above => value > threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRule {
    pub metric: Metric,
    pub threshold: f64,
    pub direction: Direction,
    pub message: &'static str,
}

impl AlertRule {
    pub const fn new(
        metric: Metric,
        threshold: f64,
        direction: Direction,
        message: &'static str,
    ) -> Self {
        Self {
            metric,
            threshold,
            direction,
            message,
        }
    }
}

/// An alert raised for one reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alert {
    pub metric: Metric,
    pub direction: Direction,
    pub value: f64,
    pub threshold: f64,
    pub message: &'static str,
}

// ───────────────────────────────────────────────────────────────
// Cooldown table
// ───────────────────────────────────────────────────────────────

/// Message → epoch millis of its last utterance.
#[derive(Debug, Clone)]
pub struct CooldownTable {
    last_spoken: LinearMap<&'static str, i64, MAX_RULES>,
}

impl Default for CooldownTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CooldownTable {
    pub fn new() -> Self {
        Self {
            last_spoken: LinearMap::new(),
        }
    }

    /// When `message` was last spoken, if ever.
    pub fn last_spoken(&self, message: &'static str) -> Option<i64> {
        self.last_spoken.get(&message).copied()
    }

    /// Whether `message` may be spoken at `now_ms`.  Never spoken counts as
    /// infinitely long ago.
    pub fn has_elapsed(&self, message: &'static str, now_ms: i64, cooldown_ms: i64) -> bool {
        match self.last_spoken(message) {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
        }
    }

    fn stamp(&mut self, message: &'static str, now_ms: i64) {
        if self.last_spoken.insert(message, now_ms).is_err() {
            warn!("Cooldown table full, alert '{}' will not be rate-limited", message);
        }
    }

    pub fn len(&self) -> usize {
        self.last_spoken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_spoken.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Evaluator
// ───────────────────────────────────────────────────────────────

pub struct AlertEvaluator {
    rules: HVec<AlertRule, MAX_RULES>,
    cooldown_ms: i64,
}

impl AlertEvaluator {
    /// Evaluator with explicit rules.  Rules beyond [`MAX_RULES`] are dropped.
    pub fn new(rules: &[AlertRule], cooldown_ms: i64) -> Self {
        if rules.len() > MAX_RULES {
            warn!(
                "AlertEvaluator: {} rules configured, only the first {} are used",
                rules.len(),
                MAX_RULES
            );
        }
        Self {
            rules: rules.iter().take(MAX_RULES).copied().collect(),
            cooldown_ms,
        }
    }

    /// The three dashboard rules: low moisture, low pH, high pH.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            &[
                AlertRule::new(
                    Metric::Moisture,
                    config.moisture_low_threshold,
                    Direction::Below,
                    LOW_MOISTURE_MESSAGE,
                ),
                AlertRule::new(
                    Metric::Ph,
                    config.ph_low_threshold,
                    Direction::Below,
                    LOW_PH_MESSAGE,
                ),
                AlertRule::new(
                    Metric::Ph,
                    config.ph_high_threshold,
                    Direction::Above,
                    HIGH_PH_MESSAGE,
                ),
            ],
            config.alert_cooldown_ms,
        )
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    pub fn cooldown_ms(&self) -> i64 {
        self.cooldown_ms
    }

    /// Evaluate every rule against `reading` at `now_ms`.
    ///
    /// Returns the alerts to vocalize, in rule order, and stamps `table`
    /// for each of them.
    pub fn evaluate(
        &self,
        reading: &Reading,
        now_ms: i64,
        table: &mut CooldownTable,
    ) -> HVec<Alert, MAX_RULES> {
        let mut fired = HVec::new();

        for rule in &self.rules {
            let value = reading.value(rule.metric);
            debug_assert!(value.is_finite(), "non-finite {} reading", rule.metric);

            if !rule.direction.violated(value, rule.threshold) {
                continue;
            }
            if !table.has_elapsed(rule.message, now_ms, self.cooldown_ms) {
                debug!("ALERT suppressed (cooldown): {} = {:.2}", rule.metric, value);
                continue;
            }

            info!(
                "ALERT: {} {:.2} {} {:.2}",
                rule.metric,
                value,
                if rule.direction == Direction::Below { "<" } else { ">" },
                rule.threshold
            );
            table.stamp(rule.message, now_ms);
            // Capacity equals the rule capacity, so this cannot overflow.
            let _ = fired.push(Alert {
                metric: rule.metric,
                direction: rule.direction,
                value,
                threshold: rule.threshold,
                message: rule.message,
            });
        }

        fired
    }
}
