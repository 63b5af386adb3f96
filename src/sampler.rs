use rand::Rng;

use crate::error::{ForgeError, Result};
use crate::models::TraitConfig;

/// Draws exactly one value from a trait configuration.
///
/// Without weights every value is equally likely. With weights, a point is
/// drawn uniformly in `[0, total)` and the values are walked in declared
/// order, subtracting each weight until the remainder drops to zero or
/// below. Every value with a positive weight stays reachable.
pub fn sample_value<'a, R: Rng + ?Sized>(
    config: &'a TraitConfig,
    rng: &mut R,
) -> Result<&'a str> {
    if config.values.is_empty() {
        return Err(ForgeError::InvalidConfig(format!(
            "Trait '{}' has no values",
            config.name
        )));
    }

    match &config.weights {
        None => {
            let index = rng.gen_range(0..config.values.len());
            Ok(&config.values[index])
        }
        Some(weights) => {
            if weights.len() != config.values.len() {
                return Err(ForgeError::InvalidConfig(format!(
                    "Trait '{}' has {} weights for {} values",
                    config.name,
                    weights.len(),
                    config.values.len()
                )));
            }
            let total: f64 = weights.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return Err(ForgeError::InvalidConfig(format!(
                    "Trait '{}' weights must sum to more than zero",
                    config.name
                )));
            }

            let mut remainder = rng.gen::<f64>() * total;
            for (value, weight) in config.values.iter().zip(weights) {
                remainder -= weight;
                if remainder <= 0.0 {
                    return Ok(value);
                }
            }

            // Floating-point underrun at the upper boundary: fall back to
            // the last positively weighted value.
            let index = weights
                .iter()
                .rposition(|w| *w > 0.0)
                .unwrap_or(weights.len() - 1);
            Ok(&config.values[index])
        }
    }
}

/// Samples every trait independently for one collection item, preserving
/// the declared trait order.
pub fn sample_traits<R: Rng + ?Sized>(
    configs: &[TraitConfig],
    rng: &mut R,
) -> Result<Vec<(String, String)>> {
    let mut sampled = Vec::with_capacity(configs.len());
    for config in configs {
        let value = sample_value(config, rng)?;
        sampled.push((config.name.clone(), value.to_string()));
    }
    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn trait_config(values: &[&str], weights: Option<Vec<f64>>) -> TraitConfig {
        TraitConfig {
            name: "Background".to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
            weights,
        }
    }

    fn tally(config: &TraitConfig, draws: usize, seed: u64) -> HashMap<String, usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..draws {
            let value = sample_value(config, &mut rng).unwrap();
            *counts.entry(value.to_string()).or_default() += 1;
        }
        counts
    }

    #[test]
    fn weighted_sampling_tracks_declared_proportions() {
        let config = trait_config(&["Red", "Blue"], Some(vec![3.0, 1.0]));
        let counts = tally(&config, 4000, 7);

        let red = counts.get("Red").copied().unwrap_or(0);
        // Expectation 3000, five sigma is roughly 140.
        assert!((2850..=3150).contains(&red), "Red drawn {} times", red);
        assert_eq!(red + counts.get("Blue").copied().unwrap_or(0), 4000);
    }

    #[test]
    fn uniform_sampling_covers_all_values_evenly() {
        let config = trait_config(&["A", "B", "C", "D"], None);
        let counts = tally(&config, 8000, 11);

        for value in ["A", "B", "C", "D"] {
            let n = counts.get(value).copied().unwrap_or(0);
            assert!((1800..=2200).contains(&n), "{} drawn {} times", value, n);
        }
    }

    #[test]
    fn positive_weight_values_are_reachable() {
        let config = trait_config(&["Common", "Rare"], Some(vec![1000.0, 1.0]));
        let counts = tally(&config, 20_000, 3);
        assert!(counts.get("Rare").copied().unwrap_or(0) > 0);
    }

    #[test]
    fn zero_weight_values_are_never_drawn() {
        let config = trait_config(&["Live", "Dead"], Some(vec![1.0, 0.0]));
        let counts = tally(&config, 2000, 5);
        assert_eq!(counts.get("Dead"), None);
    }

    #[test]
    fn empty_values_rejected() {
        let config = trait_config(&[], None);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_value(&config, &mut rng).is_err());
    }

    #[test]
    fn mismatched_weights_rejected_at_sampling_time() {
        let config = trait_config(&["Red", "Blue"], Some(vec![1.0]));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_value(&config, &mut rng).is_err());
    }

    #[test]
    fn traits_sampled_in_declared_order() {
        let configs = vec![
            trait_config(&["Red"], None),
            TraitConfig {
                name: "Eyes".to_string(),
                values: vec!["Laser".to_string()],
                weights: None,
            },
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let sampled = sample_traits(&configs, &mut rng).unwrap();
        assert_eq!(sampled[0], ("Background".to_string(), "Red".to_string()));
        assert_eq!(sampled[1], ("Eyes".to_string(), "Laser".to_string()));
    }
}
