//! Runtime mapping resolver
//!
//! Assigns every step, regular and synthetic, to a deployment module
//! according to a `PlacementConfig`.
//!
//! `RuntimeMappingResolver::resolve` is pure: it returns the resolution
//! together with every diagnostic it found, in step order. Strict mode
//! reports problems as errors, lenient mode as warnings; a step with no
//! resolvable module is an error in strict mode and simply left unassigned
//! in lenient mode. `resolve_checked` escalates strict-mode errors to a
//! single `CompileError::RuntimeMapping` listing all of them.

pub mod keys;

pub use keys::{candidate_keys, strip_observe, SyntheticKey, SyntheticKeyStrategy};

use crate::error::{CompileError, Result};
use indexmap::IndexMap;
use keys::aspect_family;
use pipeweld_core::diagnostic::Diagnostic;
use pipeweld_core::ir::StepDescriptor;
use pipeweld_core::naming::kebab_case;
use pipeweld_core::placement::{
    Layout, ModuleStrategy, PlacementConfig, ResolutionParts, RuntimeMappingResolution,
    SyntheticStrategy, MONOLITH_FALLBACK_MODULE,
};

const MODULE_SUFFIX: &str = "-svc";

/// Collects diagnostics at the severity the validation mode calls for
struct Report {
    strict: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn new(strict: bool) -> Self {
        Self {
            strict,
            diagnostics: Vec::new(),
        }
    }

    /// A configuration problem: error when strict, warning otherwise
    fn problem(&mut self, subject: &str, message: String) {
        let diagnostic = if self.strict {
            Diagnostic::error(message)
        } else {
            Diagnostic::warning(message)
        };
        self.diagnostics.push(diagnostic.with_subject(subject));
    }

    /// A step without placement: error when strict, nothing otherwise
    fn missing(&mut self, subject: &str, message: String) {
        if self.strict {
            self.diagnostics
                .push(Diagnostic::error(message).with_subject(subject));
        }
    }
}

/// Module placement resolver
pub struct RuntimeMappingResolver<'a> {
    config: &'a PlacementConfig,
}

impl<'a> RuntimeMappingResolver<'a> {
    pub fn new(config: &'a PlacementConfig) -> Self {
        Self { config }
    }

    /// Resolve module placement for `steps`
    pub fn resolve(&self, steps: &[StepDescriptor]) -> RuntimeMappingResolution {
        let mut report = Report::new(self.config.is_strict());
        let mut parts = ResolutionParts {
            layout: self.config.layout,
            ..ResolutionParts::default()
        };

        let (regular, synthetic): (Vec<&StepDescriptor>, Vec<&StepDescriptor>) =
            steps.iter().partition(|s| !s.is_side_effect());

        if self.config.layout == Layout::Monolith {
            self.resolve_monolith(steps, &mut parts, &mut report);
        } else {
            self.resolve_regular(&regular, &mut parts, &mut report);
            self.resolve_synthetic(&synthetic, &mut parts, &mut report);
        }

        self.assign_runtimes(&mut parts, &mut report);

        if self.config.layout == Layout::PipelineRuntime {
            self.check_single_runtime(&regular, &parts, &mut report);
        }

        parts.diagnostics = report.diagnostics;
        RuntimeMappingResolution::from_parts(parts)
    }

    /// Resolve, failing with every error when validation is strict
    pub fn resolve_checked(&self, steps: &[StepDescriptor]) -> Result<RuntimeMappingResolution> {
        let resolution = self.resolve(steps);

        if self.config.is_strict() && resolution.has_errors() {
            return Err(CompileError::RuntimeMapping {
                errors: resolution.errors().map(|d| d.to_string()).collect(),
            });
        }

        Ok(resolution)
    }

    /// Module used by the monolith layout
    pub fn monolith_module(&self) -> String {
        match &self.config.defaults.module {
            ModuleStrategy::Named(name) => name.clone(),
            _ => self
                .config
                .modules
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| MONOLITH_FALLBACK_MODULE.to_string()),
        }
    }

    fn resolve_monolith(
        &self,
        steps: &[StepDescriptor],
        parts: &mut ResolutionParts,
        report: &mut Report,
    ) {
        let module = self.monolith_module();

        for step in steps {
            parts
                .module_assignments
                .insert(step.name().to_string(), module.clone());
            if !step.is_side_effect() {
                parts
                    .namespace_modules
                    .entry(step.namespace().to_string())
                    .or_insert_with(|| module.clone());
            }
        }

        let overrides = self.config.steps.iter().chain(self.config.synthetics.iter());
        for (key, target) in overrides {
            if target != &module {
                report.problem(
                    key,
                    format!(
                        "monolith layout places every step in '{}', but the override maps it to '{}'",
                        module, target
                    ),
                );
            }
        }
    }

    fn resolve_regular(
        &self,
        steps: &[&StepDescriptor],
        parts: &mut ResolutionParts,
        report: &mut Report,
    ) {
        for step in steps {
            let explicit = candidate_keys(step).into_iter().find_map(|key| {
                self.config
                    .steps
                    .get(&key)
                    .filter(|module| !module.trim().is_empty())
                    .cloned()
            });

            let module = match explicit {
                Some(module) => {
                    self.check_known_module(step.name(), &module, report);
                    parts
                        .client_overrides
                        .insert(step.client_name(), module.clone());
                    Some(module)
                }
                None => self.default_module(step, report),
            };

            if let Some(module) = module {
                parts
                    .namespace_modules
                    .entry(step.namespace().to_string())
                    .or_insert_with(|| module.clone());
                parts
                    .module_assignments
                    .insert(step.name().to_string(), module);
            }
        }
    }

    fn default_module(&self, step: &StepDescriptor, report: &mut Report) -> Option<String> {
        match self.config.defaults.module.clone() {
            ModuleStrategy::PerStep => Some(per_step_module(step.base_name())),
            ModuleStrategy::Named(name) => Some(name),
            ModuleStrategy::Shared => {
                if self.config.modules.len() == 1 {
                    self.config.modules.keys().next().cloned()
                } else {
                    report.problem(
                        step.name(),
                        format!(
                            "default module strategy 'shared' requires exactly one declared module, found {}",
                            self.config.modules.len()
                        ),
                    );
                    None
                }
            }
            ModuleStrategy::Unassigned => {
                report.missing(
                    step.name(),
                    "no module mapping and no default module strategy".to_string(),
                );
                None
            }
        }
    }

    fn resolve_synthetic(
        &self,
        steps: &[&StepDescriptor],
        parts: &mut ResolutionParts,
        report: &mut Report,
    ) {
        let keys = group_synthetic_keys(steps);

        for (step, key) in steps.iter().zip(keys.iter()) {
            let Some(key) = key else {
                continue;
            };

            let explicit = SyntheticKeyStrategy::ORDER.iter().find_map(|strategy| {
                let candidate = strategy.key(key)?;
                self.config
                    .synthetics
                    .get(&candidate)
                    .filter(|module| !module.trim().is_empty())
                    .map(|module| (*strategy, candidate, module.clone()))
            });

            let module = match explicit {
                Some((strategy, candidate, module)) => {
                    if key.ambiguous && strategy.is_payload_specific() {
                        report.problem(
                            step.name(),
                            format!(
                                "ambiguous synthetic mapping '{}' matches steps from several base steps; use '{}@<index>' (this step is @{})",
                                candidate, key.payload_id, key.index
                            ),
                        );
                    }
                    self.check_known_module(step.name(), &module, report);
                    Some(module)
                }
                None => self.default_synthetic_module(step, parts, report),
            };

            if let Some(module) = module {
                parts
                    .module_assignments
                    .insert(step.name().to_string(), module);
            }
        }
    }

    fn default_synthetic_module(
        &self,
        step: &StepDescriptor,
        parts: &ResolutionParts,
        report: &mut Report,
    ) -> Option<String> {
        let origin = step.synthetic_origin()?;

        match &self.config.defaults.synthetic.module {
            SyntheticStrategy::PerStep => Some(
                parts
                    .module_assignments
                    .get(&origin.base_step)
                    .or_else(|| parts.namespace_modules.get(&origin.base_namespace))
                    .cloned()
                    .unwrap_or_else(|| plugin_module(&origin.aspect_id)),
            ),
            SyntheticStrategy::Plugin => Some(plugin_module(&origin.aspect_id)),
            SyntheticStrategy::Named(name) => Some(name.clone()),
            SyntheticStrategy::Unassigned => {
                report.missing(
                    step.name(),
                    "no synthetic mapping and no default synthetic module strategy".to_string(),
                );
                None
            }
        }
    }

    fn check_known_module(&self, subject: &str, module: &str, report: &mut Report) {
        if !self.config.modules.is_empty() && !self.config.modules.contains_key(module) {
            report.problem(subject, format!("unknown module '{}'", module));
        }
    }

    fn assign_runtimes(&self, parts: &mut ResolutionParts, report: &mut Report) {
        if !self.config.runtimes.is_empty() {
            for (module, declaration) in &self.config.modules {
                if let Some(runtime) = declaration.runtime.as_deref() {
                    if !self.config.runtimes.iter().any(|r| r == runtime) {
                        report.problem(module, format!("unknown runtime '{}'", runtime));
                    }
                }
            }
        }

        for module in parts.module_assignments.values() {
            if !parts.module_runtimes.contains_key(module) {
                parts.module_runtimes.insert(
                    module.clone(),
                    self.config.runtime_of(module).to_string(),
                );
            }
        }
    }

    fn check_single_runtime(
        &self,
        regular: &[&StepDescriptor],
        parts: &ResolutionParts,
        report: &mut Report,
    ) {
        let mut runtimes: IndexMap<&str, &str> = IndexMap::new();

        for step in regular {
            let Some(module) = parts.module_assignments.get(step.name()) else {
                continue;
            };
            let Some(runtime) = parts.module_runtimes.get(module) else {
                continue;
            };
            runtimes.entry(runtime.as_str()).or_insert(step.name());
        }

        if runtimes.len() > 1 {
            let names: Vec<&str> = runtimes.keys().copied().collect();
            let subject = runtimes.values().nth(1).copied().unwrap_or_default();
            report.problem(
                subject,
                format!(
                    "pipeline-runtime layout requires every pipeline step to share one runtime, found {}",
                    names.join(", ")
                ),
            );
        }
    }
}

/// Per-step default module, `<kebab-base-name>-svc`
pub fn per_step_module(base_name: &str) -> String {
    format!("{}{}", kebab_case(base_name), MODULE_SUFFIX)
}

/// Plugin default module for an aspect family, `<kebab-family>-svc`
pub fn plugin_module(aspect_id: &str) -> String {
    format!("{}{}", kebab_case(aspect_family(aspect_id)), MODULE_SUFFIX)
}

/// Derive synthetic keys and number each payload group in step order
fn group_synthetic_keys(steps: &[&StepDescriptor]) -> Vec<Option<SyntheticKey>> {
    let mut keys: Vec<Option<SyntheticKey>> =
        steps.iter().map(|step| SyntheticKey::derive(step)).collect();

    // payload id -> (member positions, distinct base steps)
    let mut groups: IndexMap<String, (Vec<usize>, Vec<&str>)> = IndexMap::new();
    for (position, (step, key)) in steps.iter().zip(keys.iter()).enumerate() {
        let (Some(key), Some(origin)) = (key, step.synthetic_origin()) else {
            continue;
        };
        let (members, bases) = groups.entry(key.payload_id.clone()).or_default();
        members.push(position);
        if !bases.contains(&origin.base_step.as_str()) {
            bases.push(origin.base_step.as_str());
        }
    }

    for (members, bases) in groups.values() {
        let ambiguous = bases.len() > 1;
        for (index, position) in members.iter().enumerate() {
            if let Some(key) = keys[*position].as_mut() {
                key.index = index;
                key.ambiguous = ambiguous;
            }
        }
    }

    keys
}
