//! Sweep seed sources.
//!
//! A sweep draws its seed once and hands the same value to every run. The
//! source is injected so tests and replays can pin it.

use rand::Rng;

use crate::contract::NormalizedSweep;

pub trait SeedSource {
    fn seed(&self) -> u64;
}

/// Fresh value from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSeedSource;

impl SeedSource for SystemSeedSource {
    fn seed(&self) -> u64 {
        rand::thread_rng().gen()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeedSource(pub u64);

impl SeedSource for FixedSeedSource {
    fn seed(&self) -> u64 {
        self.0
    }
}

/// Reads the seed from the driver's own environment, falling back when the
/// variable is unset or not an unsigned integer.
#[derive(Debug, Clone)]
pub struct EnvSeedSource<F = SystemSeedSource> {
    var: String,
    fallback: F,
}

impl<F: SeedSource> EnvSeedSource<F> {
    pub fn new(var: impl Into<String>, fallback: F) -> Self {
        Self {
            var: var.into(),
            fallback,
        }
    }
}

impl<F: SeedSource> SeedSource for EnvSeedSource<F> {
    fn seed(&self) -> u64 {
        std::env::var(&self.var)
            .ok()
            .and_then(|raw| parse_seed(&raw))
            .unwrap_or_else(|| self.fallback.seed())
    }
}

pub fn parse_seed(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// An explicit seed on the request wins over the source.
pub fn resolve_seed(sweep: &NormalizedSweep, source: &impl SeedSource) -> u64 {
    sweep.seed.unwrap_or_else(|| source.seed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{normalize_request, SweepRequest};

    #[test]
    fn system_source_varies_between_draws() {
        let source = SystemSeedSource;
        assert_ne!(source.seed(), source.seed());
    }

    #[test]
    fn env_source_prefers_variable_and_falls_back() {
        let var = "SWEEP_CORE_ENV_SEED_SOURCE_TEST";
        let source = EnvSeedSource::new(var, FixedSeedSource(7));

        std::env::remove_var(var);
        assert_eq!(source.seed(), 7);

        std::env::set_var(var, " 12345 ");
        assert_eq!(source.seed(), 12345);

        std::env::set_var(var, "not-a-number");
        assert_eq!(source.seed(), 7);

        std::env::remove_var(var);
    }

    #[test]
    fn request_seed_overrides_source() {
        let mut request = SweepRequest::standard(1, ["a"], ["b"], ["c"]);
        let unpinned = normalize_request(request.clone()).expect("request should pass");
        assert_eq!(resolve_seed(&unpinned, &FixedSeedSource(3)), 3);

        request.seed = Some(11);
        let pinned = normalize_request(request).expect("request should pass");
        assert_eq!(resolve_seed(&pinned, &FixedSeedSource(3)), 11);
    }
}
