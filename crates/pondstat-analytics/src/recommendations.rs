//! Threshold rules that turn KPIs into actionable recommendations.
//!
//! Rules are evaluated in declaration order against already computed figures.
//! Each fires at most once, and a rule whose input is missing is skipped.

use crate::kpi::KpiSet;
use crate::quality::WaterQualitySummary;
use crate::settings::RecommendationThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Worth doing.
    Low,
    /// Should be scheduled.
    Medium,
    /// Act now.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(name)
    }
}

/// A fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Area of operations.
    pub category: String,
    /// Urgency.
    pub priority: Priority,
    /// What is wrong.
    pub issue: String,
    /// What to do about it.
    pub recommendation: String,
    /// Observed value that fired the rule.
    pub current_value: f64,
    /// Band the value should be in.
    pub target_range: String,
}

/// Figures the rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RuleInputs {
    avg_ph: Option<f64>,
    avg_dissolved_oxygen: Option<f64>,
    average_fcr: Option<f64>,
    pond_utilization: Option<f64>,
}

type Rule = fn(&RuleInputs, &RecommendationThresholds) -> Option<Recommendation>;

const RULES: [Rule; 4] = [ph_rule, dissolved_oxygen_rule, fcr_rule, utilization_rule];

const WATER_QUALITY: &str = "Water Quality";

fn ph_rule(inputs: &RuleInputs, t: &RecommendationThresholds) -> Option<Recommendation> {
    let ph = inputs.avg_ph?;
    (ph < t.ph_min || ph > t.ph_max).then(|| Recommendation {
        category: WATER_QUALITY.to_string(),
        priority: Priority::High,
        issue: "pH levels outside optimal range".to_string(),
        recommendation: "Adjust pH with lime or pH buffers".to_string(),
        current_value: ph,
        target_range: format!("{}-{}", t.ph_min, t.ph_max),
    })
}

fn dissolved_oxygen_rule(inputs: &RuleInputs, t: &RecommendationThresholds) -> Option<Recommendation> {
    let oxygen = inputs.avg_dissolved_oxygen?;
    (oxygen < t.dissolved_oxygen_min).then(|| Recommendation {
        category: WATER_QUALITY.to_string(),
        priority: Priority::High,
        issue: "Low dissolved oxygen levels".to_string(),
        recommendation: "Increase aeration or reduce stocking density".to_string(),
        current_value: oxygen,
        target_range: format!("> {} mg/L", t.dissolved_oxygen_min),
    })
}

fn fcr_rule(inputs: &RuleInputs, t: &RecommendationThresholds) -> Option<Recommendation> {
    let fcr = inputs.average_fcr?;
    (fcr > t.fcr_max).then(|| Recommendation {
        category: "Feed Management".to_string(),
        priority: Priority::Medium,
        issue: "High feed conversion ratio".to_string(),
        recommendation: "Review feeding schedule and feed quality".to_string(),
        current_value: fcr,
        target_range: format!("< {}", t.fcr_max),
    })
}

fn utilization_rule(inputs: &RuleInputs, t: &RecommendationThresholds) -> Option<Recommendation> {
    let utilization = inputs.pond_utilization?;
    (utilization < t.utilization_min).then(|| Recommendation {
        category: "Pond Management".to_string(),
        priority: Priority::Low,
        issue: "Low pond utilization".to_string(),
        recommendation: "Consider activating more ponds".to_string(),
        current_value: utilization,
        target_range: format!("> {}%", t.utilization_min),
    })
}

/// Evaluate every rule against the KPI set.
///
/// Water averages come from `water` when it is backed by readings, otherwise
/// from the KPI set.
pub fn generate_recommendations(
    kpis: &KpiSet,
    water: Option<&WaterQualitySummary>,
    thresholds: &RecommendationThresholds,
) -> Vec<Recommendation> {
    let water = water.filter(|w| w.has_readings());
    let inputs = RuleInputs {
        avg_ph: water.map_or(kpis.avg_ph, |w| w.avg_ph),
        avg_dissolved_oxygen: water.map_or(kpis.avg_dissolved_oxygen, |w| w.avg_dissolved_oxygen),
        average_fcr: kpis.average_fcr,
        pond_utilization: kpis.pond_utilization,
    };

    RULES
        .iter()
        .filter_map(|rule| rule(&inputs, thresholds))
        .collect()
}
