//! The six fixed priority categories and the two closed maps keyed by them:
//! `PriorityWeights` (each in [0, 1], summing to 1.0) and `MatchBreakdown`
//! (each in [0, 100]).
//!
//! Both maps deserialize with `deny_unknown_fields` and no defaults, so a reply
//! with a missing or extra key fails to parse instead of being coerced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed slack between the weight sum and 1.0 before the vector is flagged.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

pub const BREAKDOWN_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Academic,
    Leadership,
    Service,
    Innovation,
    PersonalStory,
    Extracurricular,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Academic,
        Category::Leadership,
        Category::Service,
        Category::Innovation,
        Category::PersonalStory,
        Category::Extracurricular,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Academic => "academic",
            Category::Leadership => "leadership",
            Category::Service => "service",
            Category::Innovation => "innovation",
            Category::PersonalStory => "personal_story",
            Category::Extracurricular => "extracurricular",
        }
    }

    /// Human-readable name used inside prompts.
    pub fn label(self) -> &'static str {
        match self {
            Category::Academic => "academic achievement",
            Category::Leadership => "leadership",
            Category::Service => "community service",
            Category::Innovation => "innovation",
            Category::PersonalStory => "personal story",
            Category::Extracurricular => "extracurricular involvement",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CategoryError {
    #[error("{category} value {value} is not a finite number")]
    NonFinite { category: Category, value: f64 },

    #[error("{category} value {value} is outside [0, {max}]")]
    OutOfRange {
        category: Category,
        value: f64,
        max: f64,
    },

    #[error("weights sum to {sum:.4}, expected 1.0")]
    BadSum { sum: f64 },

    #[error("weights sum to zero and cannot be renormalized")]
    ZeroSum,
}

/// How much a scholarship values each category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityWeights {
    pub academic: f64,
    pub leadership: f64,
    pub service: f64,
    pub innovation: f64,
    pub personal_story: f64,
    pub extracurricular: f64,
}

impl PriorityWeights {
    pub fn from_fn(mut f: impl FnMut(Category) -> f64) -> Self {
        Self {
            academic: f(Category::Academic),
            leadership: f(Category::Leadership),
            service: f(Category::Service),
            innovation: f(Category::Innovation),
            personal_story: f(Category::PersonalStory),
            extracurricular: f(Category::Extracurricular),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Academic => self.academic,
            Category::Leadership => self.leadership,
            Category::Service => self.service,
            Category::Innovation => self.innovation,
            Category::PersonalStory => self.personal_story,
            Category::Extracurricular => self.extracurricular,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }

    /// Collects every violation: non-finite values, values outside [0, 1], and a
    /// sum further than `WEIGHT_SUM_TOLERANCE` from 1.0.
    pub fn validate(&self) -> Result<(), Vec<CategoryError>> {
        let mut issues: Vec<CategoryError> = self
            .iter()
            .filter_map(|(category, value)| check_range(category, value, 1.0).err())
            .collect();

        if issues.is_empty() {
            let sum = self.sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                issues.push(CategoryError::BadSum { sum });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Rescales the vector to sum to 1.0.
    ///
    /// Fails on non-finite or negative entries and on an all-zero vector; those
    /// carry no usable ranking. Values above 1.0 (e.g. percentages) are fine.
    pub fn normalized(&self) -> Result<PriorityWeights, CategoryError> {
        for (category, value) in self.iter() {
            if !value.is_finite() {
                return Err(CategoryError::NonFinite { category, value });
            }
            if value < 0.0 {
                return Err(CategoryError::OutOfRange {
                    category,
                    value,
                    max: 1.0,
                });
            }
        }
        let sum = self.sum();
        if sum <= 0.0 {
            return Err(CategoryError::ZeroSum);
        }
        Ok(PriorityWeights::from_fn(|c| self.get(c) / sum))
    }

    /// Categories ordered by weight, heaviest first. Ties keep `Category::ALL` order.
    pub fn ranked(&self) -> Vec<(Category, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Σ breakdown[c] × weight[c].
    pub fn weighted_score(&self, breakdown: &MatchBreakdown) -> f64 {
        Category::ALL
            .into_iter()
            .map(|c| breakdown.get(c) * self.get(c))
            .sum()
    }
}

/// Per-category student strength, 0–100 each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchBreakdown {
    pub academic: f64,
    pub leadership: f64,
    pub service: f64,
    pub innovation: f64,
    pub personal_story: f64,
    pub extracurricular: f64,
}

impl MatchBreakdown {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Academic => self.academic,
            Category::Leadership => self.leadership,
            Category::Service => self.service,
            Category::Innovation => self.innovation,
            Category::PersonalStory => self.personal_story,
            Category::Extracurricular => self.extracurricular,
        }
    }

    pub fn validate(&self) -> Result<(), CategoryError> {
        Category::ALL
            .into_iter()
            .try_for_each(|c| check_range(c, self.get(c), BREAKDOWN_MAX))
    }
}

fn check_range(category: Category, value: f64, max: f64) -> Result<(), CategoryError> {
    if !value.is_finite() {
        return Err(CategoryError::NonFinite { category, value });
    }
    if !(0.0..=max).contains(&value) {
        return Err(CategoryError::OutOfRange {
            category,
            value,
            max,
        });
    }
    Ok(())
}
