use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Floor below which a weight sum is treated as zero.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Side weights. Projects lean heavier because they show demonstrable
/// experience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub projects: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.35,
            projects: 0.65,
        }
    }
}

impl MatchWeights {
    /// Scales both weights to sum to 1. Negative or non-finite values count
    /// as zero; a sum at or below [`WEIGHT_EPSILON`] falls back to defaults.
    pub fn normalized(self) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let (mut skills, mut projects) = (clean(self.skills), clean(self.projects));
        if !(skills + projects).is_finite() {
            // the sum of two huge finite weights overflows; rescale first
            let largest = skills.max(projects);
            skills /= largest;
            projects /= largest;
        }
        let total = skills + projects;
        if total <= WEIGHT_EPSILON {
            let defaults = Self::default();
            let total = defaults.skills + defaults.projects;
            return Self {
                skills: defaults.skills / total,
                projects: defaults.projects / total,
            };
        }
        Self {
            skills: skills / total,
            projects: projects / total,
        }
    }

    /// Applies caller overrides on top of `base`, then normalizes.
    ///
    /// Only `skills` and `projects` are read; unknown keys are ignored and
    /// values that are not non-negative numbers are discarded.
    pub fn resolve(base: MatchWeights, overrides: Option<&Map<String, Value>>) -> Self {
        let Some(overrides) = overrides else {
            return base.normalized();
        };
        let pick = |key: &str, fallback: f64| {
            overrides
                .get(key)
                .and_then(Value::as_f64)
                .filter(|w| w.is_finite() && *w >= 0.0)
                .unwrap_or(fallback)
        };
        Self {
            skills: pick("skills", base.skills),
            projects: pick("projects", base.projects),
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn sum(w: MatchWeights) -> f64 {
        w.skills + w.projects
    }

    #[test]
    fn test_defaults_when_absent() {
        let w = MatchWeights::resolve(MatchWeights::default(), None);
        assert_eq!(w, MatchWeights::default());
    }

    #[test]
    fn test_override_used_verbatim_when_summing_to_one() {
        let o = map(json!({"skills": 0.9, "projects": 0.1}));
        let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
        assert_eq!(w, MatchWeights { skills: 0.9, projects: 0.1 });
    }

    #[test]
    fn test_unknown_keys_and_non_numeric_values_ignored() {
        let o = map(json!({"skills": "lots", "projects": 3, "bonus": 10}));
        let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
        assert!((w.skills - 0.35 / 3.35).abs() < 1e-12);
        assert!((sum(w) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_weight_discarded() {
        let o = map(json!({"skills": -1, "projects": 0}));
        let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
        assert_eq!(w, MatchWeights { skills: 1.0, projects: 0.0 });
    }

    #[test]
    fn test_overflowing_sum_keeps_ratio() {
        let o = map(json!({"skills": 1.7e308, "projects": 1.7e308}));
        let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
        assert_eq!(w, MatchWeights { skills: 0.5, projects: 0.5 });
    }

    #[test]
    fn test_zero_sum_falls_back_to_defaults() {
        for o in [
            json!({"skills": 0, "projects": 0}),
            json!({"skills": 1e-12, "projects": 0}),
        ] {
            let o = map(o);
            let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
            assert_eq!(w, MatchWeights::default().normalized(), "{o:?}");
        }
    }

    #[test]
    fn test_weights_always_sum_to_one() {
        let cases = [
            json!({}),
            json!({"skills": 7}),
            json!({"skills": 1e300, "projects": 1e300}),
            json!({"skills": 1.7e308, "projects": 1.7e308}),
            json!({"skills": 1.7e308, "projects": 1}),
            json!({"skills": 0.0001, "projects": 1234.5}),
            json!({"projects": null}),
        ];
        for o in cases {
            let o = map(o);
            let w = MatchWeights::resolve(MatchWeights::default(), Some(&o));
            assert!((sum(w) - 1.0).abs() < 1e-9, "{o:?} -> {w:?}");
        }
    }
}
