//! Engine configuration.

use inkwell::OptimizationLevel;
use serde::{Deserialize, Serialize};

/// JIT code-generation optimization level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptLevel {
    /// No optimization; the module runs as written.
    #[default]
    None,
    /// Light optimization.
    Less,
    /// The code generator's default pipeline.
    Default,
    /// Aggressive optimization.
    Aggressive,
}

impl From<OptLevel> for OptimizationLevel {
    fn from(level: OptLevel) -> Self {
        match level {
            OptLevel::None => OptimizationLevel::None,
            OptLevel::Less => OptimizationLevel::Less,
            OptLevel::Default => OptimizationLevel::Default,
            OptLevel::Aggressive => OptimizationLevel::Aggressive,
        }
    }
}

/// Configuration for [`Executor`](crate::Executor) construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// JIT optimization level. Defaults to [`OptLevel::None`]: quantum
    /// dispatch order must match the IR as written.
    pub opt_level: OptLevel,
}

impl EngineConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JIT optimization level.
    pub fn with_opt_level(mut self, level: OptLevel) -> Self {
        self.opt_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_optimization() {
        assert_eq!(EngineConfig::new().opt_level, OptLevel::None);
    }

    #[test]
    fn builder_sets_the_level() {
        let config = EngineConfig::new().with_opt_level(OptLevel::Aggressive);
        assert_eq!(config.opt_level, OptLevel::Aggressive);
    }
}
