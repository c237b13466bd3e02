//! Placement configuration
//!
//! Parsed from the `runtime-mapping` document. All maps keep declaration
//! order so that resolution is reproducible.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Module used by the monolith layout when nothing else names one
pub const MONOLITH_FALLBACK_MODULE: &str = "monolith-svc";

/// Runtime assigned to modules that do not declare one
pub const DEFAULT_RUNTIME: &str = "default";

/// Placement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Everything in one module
    Monolith,
    /// Steps share the single declared module unless mapped
    Shared,
    /// One module per step unless mapped
    PerModule,
    /// Like per-module, but all pipeline steps must share one runtime
    PipelineRuntime,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::PerModule
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Layout::Monolith => "monolith",
            Layout::Shared => "shared",
            Layout::PerModule => "per-module",
            Layout::PipelineRuntime => "pipeline-runtime",
        };
        f.write_str(s)
    }
}

/// Whether placement problems are fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    Strict,
    Lenient,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode::Strict
    }
}

/// Default module strategy for regular steps
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleStrategy {
    /// `<kebab-base-name>-svc`
    PerStep,
    /// The single declared module
    Shared,
    /// No default; unmapped steps have no placement
    Unassigned,
    /// A fixed module name
    Named(String),
}

impl Default for ModuleStrategy {
    fn default() -> Self {
        ModuleStrategy::PerStep
    }
}

impl From<String> for ModuleStrategy {
    fn from(value: String) -> Self {
        match value.trim() {
            "per-step" => ModuleStrategy::PerStep,
            "shared" => ModuleStrategy::Shared,
            "" | "none" => ModuleStrategy::Unassigned,
            other => ModuleStrategy::Named(other.to_string()),
        }
    }
}

impl From<ModuleStrategy> for String {
    fn from(value: ModuleStrategy) -> Self {
        match value {
            ModuleStrategy::PerStep => "per-step".to_string(),
            ModuleStrategy::Shared => "shared".to_string(),
            ModuleStrategy::Unassigned => "none".to_string(),
            ModuleStrategy::Named(name) => name,
        }
    }
}

/// Default module strategy for synthetic side-effect steps
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SyntheticStrategy {
    /// Module of the base step, else of its namespace, else the plugin default
    PerStep,
    /// Fixed per-aspect-family plugin module
    Plugin,
    Unassigned,
    Named(String),
}

impl Default for SyntheticStrategy {
    fn default() -> Self {
        SyntheticStrategy::PerStep
    }
}

impl From<String> for SyntheticStrategy {
    fn from(value: String) -> Self {
        match value.trim() {
            "per-step" => SyntheticStrategy::PerStep,
            "plugin" => SyntheticStrategy::Plugin,
            "" | "none" => SyntheticStrategy::Unassigned,
            other => SyntheticStrategy::Named(other.to_string()),
        }
    }
}

impl From<SyntheticStrategy> for String {
    fn from(value: SyntheticStrategy) -> Self {
        match value {
            SyntheticStrategy::PerStep => "per-step".to_string(),
            SyntheticStrategy::Plugin => "plugin".to_string(),
            SyntheticStrategy::Unassigned => "none".to_string(),
            SyntheticStrategy::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyntheticDefaults {
    #[serde(default)]
    pub module: SyntheticStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDefaults {
    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default)]
    pub module: ModuleStrategy,

    #[serde(default)]
    pub synthetic: SyntheticDefaults,
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            module: ModuleStrategy::default(),
            synthetic: SyntheticDefaults::default(),
        }
    }
}

/// A declared deployment module
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

/// Parsed placement configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default)]
    pub layout: Layout,

    #[serde(default)]
    pub validation: ValidationMode,

    #[serde(default)]
    pub defaults: PlacementDefaults,

    /// Declared runtimes
    #[serde(default)]
    pub runtimes: Vec<String>,

    /// Declared modules, in declaration order
    #[serde(default)]
    pub modules: IndexMap<String, ModuleDeclaration>,

    /// Explicit step -> module overrides
    #[serde(default)]
    pub steps: IndexMap<String, String>,

    /// Explicit synthetic key -> module overrides
    #[serde(default)]
    pub synthetics: IndexMap<String, String>,
}

impl PlacementConfig {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_module(mut self, name: impl Into<String>, runtime: Option<&str>) -> Self {
        self.modules.insert(
            name.into(),
            ModuleDeclaration {
                runtime: runtime.map(str::to_string),
            },
        );
        self
    }

    pub fn with_runtime(mut self, name: impl Into<String>) -> Self {
        self.runtimes.push(name.into());
        self
    }

    pub fn with_step(mut self, key: impl Into<String>, module: impl Into<String>) -> Self {
        self.steps.insert(key.into(), module.into());
        self
    }

    pub fn with_synthetic(mut self, key: impl Into<String>, module: impl Into<String>) -> Self {
        self.synthetics.insert(key.into(), module.into());
        self
    }

    pub fn with_default_module(mut self, strategy: ModuleStrategy) -> Self {
        self.defaults.module = strategy;
        self
    }

    pub fn with_default_synthetic_module(mut self, strategy: SyntheticStrategy) -> Self {
        self.defaults.synthetic.module = strategy;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.validation == ValidationMode::Strict
    }

    /// Runtime of a module: declared, else the configured default
    pub fn runtime_of(&self, module: &str) -> &str {
        self.modules
            .get(module)
            .and_then(|decl| decl.runtime.as_deref())
            .filter(|rt| !rt.trim().is_empty())
            .unwrap_or(&self.defaults.runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_string() {
        assert_eq!(ModuleStrategy::from("per-step".to_string()), ModuleStrategy::PerStep);
        assert_eq!(ModuleStrategy::from("shared".to_string()), ModuleStrategy::Shared);
        assert_eq!(
            ModuleStrategy::from("orders-svc".to_string()),
            ModuleStrategy::Named("orders-svc".to_string())
        );
        assert_eq!(SyntheticStrategy::from("plugin".to_string()), SyntheticStrategy::Plugin);
        assert_eq!(SyntheticStrategy::from("none".to_string()), SyntheticStrategy::Unassigned);
    }

    #[test]
    fn test_runtime_of() {
        let config = PlacementConfig::new(Layout::PerModule)
            .with_module("a-svc", Some("jvm"))
            .with_module("b-svc", None);
        assert_eq!(config.runtime_of("a-svc"), "jvm");
        assert_eq!(config.runtime_of("b-svc"), DEFAULT_RUNTIME);
        assert_eq!(config.runtime_of("undeclared"), DEFAULT_RUNTIME);
    }

    #[test]
    fn test_defaults() {
        let config = PlacementConfig::default();
        assert_eq!(config.layout, Layout::PerModule);
        assert!(config.is_strict());
        assert_eq!(config.defaults.module, ModuleStrategy::PerStep);
        assert_eq!(config.defaults.synthetic.module, SyntheticStrategy::PerStep);
    }
}
