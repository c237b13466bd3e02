//! Descriptor sources
//!
//! Discovery reads raw step and aspect declarations from a
//! `DescriptorSource`. The in-memory source is used by tests and by callers
//! that assemble descriptors programmatically.

use crate::error::Result;
use pipeweld_core::{AspectSource, DescriptorSet, PlacementConfig, StepSource};

/// Everything a source can hand over to discovery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredDescriptors {
    pub steps: Vec<StepSource>,
    pub aspects: Vec<AspectSource>,
    pub placement: Option<PlacementConfig>,
    pub descriptor_set: Option<DescriptorSet>,
}

/// Supplies raw descriptors to discovery
pub trait DescriptorSource {
    /// Source name used in logs
    fn name(&self) -> &str;

    fn discover(&self) -> Result<DiscoveredDescriptors>;
}

/// Descriptors assembled in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    descriptors: DiscoveredDescriptors,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: DiscoveredDescriptors) -> Self {
        Self { descriptors }
    }

    pub fn with_step(mut self, step: StepSource) -> Self {
        self.descriptors.steps.push(step);
        self
    }

    pub fn with_aspect(mut self, aspect: AspectSource) -> Self {
        self.descriptors.aspects.push(aspect);
        self
    }

    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.descriptors.placement = Some(placement);
        self
    }

    pub fn with_descriptor_set(mut self, descriptor_set: DescriptorSet) -> Self {
        self.descriptors.descriptor_set = Some(descriptor_set);
        self
    }
}

impl DescriptorSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn discover(&self) -> Result<DiscoveredDescriptors> {
        Ok(self.descriptors.clone())
    }
}
