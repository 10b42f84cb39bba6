/// Resolver configuration
use std::env;

use crate::log::targets;

/// Environment variable overriding [`ResolverConfig::max_depth`].
pub const MAX_DEPTH_VAR: &str = "SYMCALC_MAX_DEPTH";

/// The default bound on nested resolutions.
///
/// The calculator never nests deeper than three; `fib(n)` needs `n + 1`.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// The largest depth accepted from any source.
///
/// Each nested resolution takes native stack, so larger limits would overflow
/// the stack before `DepthExceeded` could be reported.
pub const MAX_DEPTH_CEILING: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How many resolutions may be active at once before a rule body's
    /// recursive call is rejected with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl ResolverConfig {
    /// Reads overrides from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = ResolverConfig::default();
        if let Ok(raw) = env::var(MAX_DEPTH_VAR) {
            match parse_depth(&raw) {
                Some(depth) => config.max_depth = depth,
                None => log::warn!(target: targets::CONFIG, "Ignoring {}={:?}: expected a positive integer", MAX_DEPTH_VAR, raw),
            }
        }
        config
    }

    /// Sets the depth limit, clamped to [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        ResolverConfig { max_depth: clamp_depth(max_depth) }
    }
}

fn clamp_depth(depth: usize) -> usize {
    if depth > MAX_DEPTH_CEILING {
        log::warn!(target: targets::CONFIG, "Clamping max depth {} to {}", depth, MAX_DEPTH_CEILING);
        MAX_DEPTH_CEILING
    } else {
        depth
    }
}

fn parse_depth(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|depth| *depth > 0).map(clamp_depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth() {
        assert_eq!(ResolverConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ResolverConfig::default().with_max_depth(8).max_depth, 8);
    }

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth("64"), Some(64));
        assert_eq!(parse_depth(" 12 "), Some(12));
        assert_eq!(parse_depth("0"), None);
        assert_eq!(parse_depth("-3"), None);
        assert_eq!(parse_depth("deep"), None);
    }

    #[test]
    fn test_oversized_depth_is_clamped() {
        assert_eq!(ResolverConfig::default().with_max_depth(10_000_000).max_depth, MAX_DEPTH_CEILING);
        assert_eq!(ResolverConfig::default().with_max_depth(MAX_DEPTH_CEILING).max_depth, MAX_DEPTH_CEILING);
        assert_eq!(parse_depth("1000000"), Some(MAX_DEPTH_CEILING));
    }
}
