//! Runtime mapping resolution
//!
//! Built once per compilation from `ResolutionParts` and never changed
//! afterwards; only accessors are exposed.

use crate::diagnostic::{Diagnostic, Severity};
use crate::placement::config::Layout;
use indexmap::IndexMap;
use serde::Serialize;

/// Raw material for a resolution, filled in by the resolver
#[derive(Debug, Clone, Default)]
pub struct ResolutionParts {
    pub layout: Layout,
    /// step name -> module, in step order
    pub module_assignments: IndexMap<String, String>,
    /// client name -> module, explicit overrides only
    pub client_overrides: IndexMap<String, String>,
    /// namespace -> module, first regular step wins
    pub namespace_modules: IndexMap<String, String>,
    /// module -> runtime, for every used module
    pub module_runtimes: IndexMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Output of the runtime mapping resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeMappingResolution {
    layout: Layout,
    module_assignments: IndexMap<String, String>,
    client_overrides: IndexMap<String, String>,
    namespace_modules: IndexMap<String, String>,
    module_runtimes: IndexMap<String, String>,
    diagnostics: Vec<Diagnostic>,
    modules_used: Vec<String>,
}

impl RuntimeMappingResolution {
    pub fn from_parts(parts: ResolutionParts) -> Self {
        let mut modules_used: Vec<String> = Vec::new();
        for module in parts.module_assignments.values() {
            if !modules_used.iter().any(|m| m == module) {
                modules_used.push(module.clone());
            }
        }

        Self {
            layout: parts.layout,
            module_assignments: parts.module_assignments,
            client_overrides: parts.client_overrides,
            namespace_modules: parts.namespace_modules,
            module_runtimes: parts.module_runtimes,
            diagnostics: parts.diagnostics,
            modules_used,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Module assigned to a step, if any
    pub fn module_for(&self, step_name: &str) -> Option<&str> {
        self.module_assignments.get(step_name).map(String::as_str)
    }

    pub fn module_assignments(&self) -> &IndexMap<String, String> {
        &self.module_assignments
    }

    pub fn client_overrides(&self) -> &IndexMap<String, String> {
        &self.client_overrides
    }

    pub fn namespace_modules(&self) -> &IndexMap<String, String> {
        &self.namespace_modules
    }

    pub fn module_runtimes(&self) -> &IndexMap<String, String> {
        &self.module_runtimes
    }

    pub fn runtime_of(&self, module: &str) -> Option<&str> {
        self.module_runtimes.get(module).map(String::as_str)
    }

    /// Modules used by at least one step, in first-use order
    pub fn modules_used(&self) -> &[String] {
        &self.modules_used
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
