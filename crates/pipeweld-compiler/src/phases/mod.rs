//! The standard compilation phases, in pipeline order

mod binding_construction;
mod discovery;
mod extraction;
mod generation;
mod infrastructure;
mod runtime_mapping;
mod semantic;
mod target_resolution;

pub use binding_construction::BindingConstructionPhase;
pub use discovery::DiscoveryPhase;
pub use extraction::{expand_aspects, extract_step, synthetic_name, ExtractionPhase};
pub use generation::GenerationPhase;
pub use infrastructure::{InfrastructurePhase, RoleMetadata, ROLE_METADATA_FILE};
pub use runtime_mapping::RuntimeMappingPhase;
pub use semantic::SemanticAnalysisPhase;
pub use target_resolution::TargetResolutionPhase;
