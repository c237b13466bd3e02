//! YAML project descriptor source
//!
//! Feeds discovery from one or more parsed project files. Steps and aspects
//! are concatenated in file order; a placement config or descriptor set may
//! be embedded in at most one of the files.

use crate::error::{Result, SdkError};
use pipeweld_compiler::{CompileError, DescriptorSource, DiscoveredDescriptors};
use pipeweld_parser::{PipelineHeader, ProjectDocument, ProjectParser};
use std::fs;
use std::path::Path;

/// Descriptor source backed by parsed project documents
#[derive(Debug, Clone, Default)]
pub struct ProjectSource {
    name: String,
    documents: Vec<(String, ProjectDocument)>,
}

impl ProjectSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }

    /// Add an already parsed document under `origin`
    pub fn with_document(mut self, origin: impl Into<String>, document: ProjectDocument) -> Self {
        self.documents.push((origin.into(), document));
        self
    }

    /// Parse `content` and add it under `origin`
    pub fn add_content(&mut self, origin: &str, content: &str) -> Result<()> {
        let document =
            ProjectParser::parse(content).map_err(|source| SdkError::InvalidProjectFile {
                path: origin.to_string(),
                source,
            })?;
        tracing::debug!(
            "Loaded project '{}' from {}",
            document.header.name,
            origin
        );
        self.documents.push((origin.to_string(), document));
        Ok(())
    }

    /// Read and parse the project file at `path`
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.add_content(&path.display().to_string(), &content)
    }

    /// Header of the first document
    pub fn header(&self) -> Option<&PipelineHeader> {
        self.documents.first().map(|(_, doc)| &doc.header)
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

impl DescriptorSource for ProjectSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn discover(&self) -> pipeweld_compiler::Result<DiscoveredDescriptors> {
        let mut discovered = DiscoveredDescriptors::default();
        let mut placement_origin: Option<&str> = None;
        let mut descriptors_origin: Option<&str> = None;

        for (origin, document) in &self.documents {
            if let Some(first) = self.header().filter(|h| h.transport != document.header.transport)
            {
                tracing::warn!(
                    "'{}' declares transport {}; using {} from project '{}'",
                    origin,
                    document.header.transport,
                    first.transport,
                    first.name
                );
            }

            discovered.steps.extend(document.steps.iter().cloned());
            discovered.aspects.extend(document.aspects.iter().cloned());

            if let Some(placement) = &document.placement {
                if let Some(previous) = placement_origin {
                    return Err(CompileError::Discovery(format!(
                        "runtime-mapping is declared in both '{}' and '{}'",
                        previous, origin
                    )));
                }
                placement_origin = Some(origin);
                discovered.placement = Some(placement.clone());
            }

            if let Some(descriptor_set) = &document.descriptor_set {
                if let Some(previous) = descriptors_origin {
                    return Err(CompileError::Discovery(format!(
                        "descriptor-set is declared in both '{}' and '{}'",
                        previous, origin
                    )));
                }
                descriptors_origin = Some(origin);
                discovered.descriptor_set = Some(descriptor_set.clone());
            }
        }

        Ok(discovered)
    }
}
