//! Random request generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::request::{Method, RequestDraft};

/// Upper bound (exclusive) for generated numeric request ids.
const MAX_GENERATED_ID: u32 = 10_000;

/// Produces drafts with a random method, path and numeric id.
#[derive(Debug, Clone)]
pub struct RequestGenerator {
    methods: Vec<Method>,
    paths: Vec<String>,
}

impl RequestGenerator {
    pub fn new(methods: Vec<Method>, paths: Vec<String>) -> Self {
        Self { methods, paths }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.methods.clone(), config.paths.clone())
    }

    /// Generate a draft using the thread-local RNG.
    pub fn generate(&self) -> RequestDraft {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a draft from the given RNG. Empty lists fall back to `GET /`.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> RequestDraft {
        let method = self.methods.choose(rng).copied().unwrap_or(Method::Get);
        let path = self
            .paths
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "/".to_string());
        let id = rng.gen_range(0..MAX_GENERATED_ID);

        RequestDraft::new(method, path).with_id(id.to_string())
    }
}

impl Default for RequestGenerator {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_values_come_from_lists() {
        let generator = RequestGenerator::default();
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let draft = generator.generate_with(&mut rng);
            assert!(config.methods.contains(&draft.method));
            assert!(config.paths.contains(&draft.path));
            let id: u32 = draft.id.unwrap().parse().unwrap();
            assert!(id < MAX_GENERATED_ID);
        }
    }

    #[test]
    fn test_empty_lists_fall_back() {
        let generator = RequestGenerator::new(Vec::new(), Vec::new());
        let draft = generator.generate();
        assert_eq!(draft.method, Method::Get);
        assert_eq!(draft.path, "/");
    }
}
