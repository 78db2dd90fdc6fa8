use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::utils::percentage::Percentage;

use super::{aggregate::AggregatedTable, error::ConfigError, vocabulary::STUDY_CATEGORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chronotype {
    MorningLeaning,
    EveningLeaning,
    General,
}

impl Display for Chronotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chronotype::MorningLeaning => write!(f, "morning-leaning"),
            Chronotype::EveningLeaning => write!(f, "evening-leaning"),
            Chronotype::General => write!(f, "general"),
        }
    }
}

/// What a rule looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RuleCondition {
    /// `public_mean - user_mean` is strictly greater than `minutes`.
    ShortageAbove { minutes: f64 },
    /// The user's share of `category` is strictly greater than `threshold`. A category missing
    /// from the user's table counts as 0%.
    CategoryShareAbove {
        category: String,
        threshold: Percentage,
    },
    Always,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub when: RuleCondition,
    pub chronotype: Chronotype,
}

/// Inputs the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RuleInputs<'a> {
    pub public_mean: f64,
    pub user_mean: f64,
    pub public_ratios: &'a AggregatedTable,
    pub user_ratios: &'a AggregatedTable,
}

impl RuleInputs<'_> {
    pub fn shortage(&self) -> f64 {
        self.public_mean - self.user_mean
    }
}

impl RuleCondition {
    pub fn matches(&self, inputs: &RuleInputs<'_>) -> bool {
        match self {
            RuleCondition::ShortageAbove { minutes } => inputs.shortage() > *minutes,
            RuleCondition::CategoryShareAbove {
                category,
                threshold,
            } => {
                let share = inputs
                    .user_ratios
                    .percentage_of(category)
                    .unwrap_or(Percentage::ZERO);
                *share > **threshold
            }
            RuleCondition::Always => true,
        }
    }
}

/// Candidate start times for each chronotype, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SlotTable {
    pub morning_leaning: Vec<String>,
    pub evening_leaning: Vec<String>,
    pub general: Vec<String>,
}

impl SlotTable {
    pub fn slots_for(&self, chronotype: Chronotype) -> &[String] {
        match chronotype {
            Chronotype::MorningLeaning => &self.morning_leaning,
            Chronotype::EveningLeaning => &self.evening_leaning,
            Chronotype::General => &self.general,
        }
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self {
            morning_leaning: vec!["08:00~10:00".into(), "10:00~12:00".into()],
            evening_leaning: vec!["15:00~17:00".into(), "17:00~19:00".into()],
            general: vec![
                "10:00~12:00".into(),
                "13:00~15:00".into(),
                "17:00~19:00".into(),
            ],
        }
    }
}

pub const DEFAULT_ADVICE: &str = "A cycle of 50 minutes of focus followed by a 10-minute break is recommended.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Evaluated in order, the first matching rule decides the chronotype.
    pub rules: Vec<Rule>,
    /// Used when no rule matches.
    pub fallback: Chronotype,
    pub slots: SlotTable,
    /// Last line of every rationale.
    pub advice: String,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule {
                    when: RuleCondition::ShortageAbove { minutes: 30. },
                    chronotype: Chronotype::EveningLeaning,
                },
                Rule {
                    when: RuleCondition::CategoryShareAbove {
                        category: STUDY_CATEGORY.into(),
                        threshold: Percentage::new_opt(40.).unwrap_or_default(),
                    },
                    chronotype: Chronotype::MorningLeaning,
                },
                Rule {
                    when: RuleCondition::Always,
                    chronotype: Chronotype::General,
                },
            ],
            fallback: Chronotype::General,
            slots: SlotTable::default(),
            advice: DEFAULT_ADVICE.into(),
        }
    }
}

/// Result of a single prediction. A new one replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub chronotype: Chronotype,
    pub slot: String,
    /// Remaining candidates for the chronotype. They aren't part of the rationale.
    pub alternatives: Vec<String>,
    pub rationale: String,
}

/// Picks a focus slot from the difference between the public and the user's averages and the
/// user's category shares.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    /// Fails if a chronotype that can be selected has no slots.
    pub fn new(config: RecommendationConfig) -> Result<Self, ConfigError> {
        let reachable = config
            .rules
            .iter()
            .map(|v| v.chronotype)
            .chain([config.fallback]);
        for chronotype in reachable {
            if config.slots.slots_for(chronotype).is_empty() {
                return Err(ConfigError::NoSlots {
                    chronotype: chronotype.to_string(),
                });
            }
        }
        Ok(Self { config })
    }

    pub fn classify(&self, inputs: &RuleInputs<'_>) -> Chronotype {
        self.config
            .rules
            .iter()
            .find(|rule| rule.when.matches(inputs))
            .map(|rule| rule.chronotype)
            .unwrap_or(self.config.fallback)
    }

    #[instrument(skip(self, public_ratios, user_ratios))]
    pub fn predict(
        &self,
        public_mean: f64,
        user_mean: f64,
        public_ratios: &AggregatedTable,
        user_ratios: &AggregatedTable,
    ) -> Recommendation {
        let inputs = RuleInputs {
            public_mean,
            user_mean,
            public_ratios,
            user_ratios,
        };
        let chronotype = self.classify(&inputs);
        let (slot, alternatives) = match self.config.slots.slots_for(chronotype) {
            [first, rest @ ..] => (first.clone(), rest.to_vec()),
            [] => (String::new(), Vec::new()),
        };
        debug!(%chronotype, slot = %slot, "Selected focus slot");

        let shortage = inputs.shortage();
        let lines = [
            if shortage > 0. {
                format!("Your study time is {shortage:.0} minutes below the average.")
            } else {
                "Your study time is at or above the average!".to_string()
            },
            format!("You appear closest to the '{chronotype}' pattern."),
            format!("Recommended focus start time: {slot}"),
            self.config.advice.clone(),
        ];

        Recommendation {
            chronotype,
            slot,
            alternatives,
            rationale: lines.join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::aggregate::{AggregatorConfig, CategoryAggregator},
        analysis::vocabulary::Vocabulary,
        input::RawTable,
        utils::logging::TEST_LOGGING,
    };

    /// User table where the study category holds `study` minutes and commuting the rest of 100.
    fn user_table(study: u32) -> AggregatedTable {
        let rows = [
            vec!["x".to_string(), "학습".to_string(), study.to_string()],
            vec!["x".to_string(), "이동".to_string(), (100 - study).to_string()],
        ];
        CategoryAggregator::new(AggregatorConfig::default())
            .unwrap()
            .aggregate(&RawTable::from_strings(["id", "행동분류별", "a"], rows))
            .unwrap()
            .table
    }

    fn empty() -> AggregatedTable {
        AggregatedTable::empty(&Vocabulary::default())
    }

    #[test]
    fn test_large_shortage_is_evening_leaning() {
        *TEST_LOGGING;
        let engine = RecommendationEngine::default();
        let result = engine.predict(150., 100., &empty(), &user_table(45));

        assert_eq!(result.chronotype, Chronotype::EveningLeaning);
        assert_eq!(result.slot, "15:00~17:00");
        assert_eq!(result.alternatives, ["17:00~19:00"]);
        assert!(result.rationale.contains("50"));
        assert!(result.rationale.contains("15:00~17:00"));
    }

    #[test]
    fn test_high_study_share_is_morning_leaning() {
        let engine = RecommendationEngine::default();
        let result = engine.predict(100., 100., &empty(), &user_table(45));

        assert_eq!(result.chronotype, Chronotype::MorningLeaning);
        assert_eq!(result.slot, "08:00~10:00");
    }

    #[test]
    fn test_otherwise_general() {
        let engine = RecommendationEngine::default();
        let result = engine.predict(100., 100., &empty(), &user_table(10));

        assert_eq!(result.chronotype, Chronotype::General);
        assert_eq!(result.slot, "10:00~12:00");
        assert_eq!(result.alternatives, ["13:00~15:00", "17:00~19:00"]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let engine = RecommendationEngine::default();
        assert_eq!(
            engine.predict(130., 100., &empty(), &user_table(40)).chronotype,
            Chronotype::General
        );
    }

    #[test]
    fn test_rationale_lines() {
        let engine = RecommendationEngine::default();
        let shortage = engine.predict(120.4, 100., &empty(), &user_table(10));
        let lines = shortage.rationale.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "Your study time is 20 minutes below the average.",
                "You appear closest to the 'general' pattern.",
                "Recommended focus start time: 10:00~12:00",
                DEFAULT_ADVICE,
            ]
        );

        let surplus = engine.predict(90., 100., &empty(), &user_table(10));
        assert!(
            surplus
                .rationale
                .starts_with("Your study time is at or above the average!")
        );
    }

    #[test]
    fn test_missing_category_counts_as_zero_share() {
        let engine = RecommendationEngine::default();
        let other = AggregatedTable::empty(&Vocabulary::new(["work"]).unwrap());
        assert_eq!(
            engine.predict(0., 0., &other, &other).chronotype,
            Chronotype::General
        );
    }

    #[test]
    fn test_fallback_when_no_rule_matches() {
        let config = RecommendationConfig {
            rules: vec![Rule {
                when: RuleCondition::ShortageAbove { minutes: 1000. },
                chronotype: Chronotype::EveningLeaning,
            }],
            fallback: Chronotype::MorningLeaning,
            ..Default::default()
        };
        let engine = RecommendationEngine::new(config).unwrap();
        assert_eq!(
            engine.predict(0., 0., &empty(), &empty()).chronotype,
            Chronotype::MorningLeaning
        );
    }

    #[test]
    fn test_rejects_reachable_chronotype_without_slots() {
        let mut config = RecommendationConfig::default();
        config.slots.morning_leaning.clear();
        assert!(matches!(
            RecommendationEngine::new(config),
            Err(ConfigError::NoSlots { .. })
        ));
    }

    #[test]
    fn test_rules_deserialize() {
        let rules: Vec<Rule> = serde_json::from_str(
            r#"[
                {"when": {"kind": "shortage-above", "minutes": 10}, "chronotype": "evening-leaning"},
                {"when": {"kind": "category-share-above", "category": "학습", "threshold": 20}, "chronotype": "morning-leaning"},
                {"when": {"kind": "always"}, "chronotype": "general"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].when, RuleCondition::Always);
    }

    #[test]
    fn test_negative_share_threshold_is_rejected() {
        let result = serde_json::from_str::<Rule>(
            r#"{"when": {"kind": "category-share-above", "category": "학습", "threshold": -1}, "chronotype": "morning-leaning"}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("percentage must be a finite non-negative number"), "{err}");
    }
}
