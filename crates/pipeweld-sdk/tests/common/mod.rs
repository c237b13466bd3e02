//! Common test utilities for SDK integration tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temp workspace holding project files and the output root
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Write `content` to `name` under the workspace and return its path
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content.trim_start()).expect("write project file");
        path
    }

    pub fn output_root(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

pub const ORDER_PIPELINE: &str = r#"
pipeline:
  name: order-pipeline
  transport: rest
  steps:
    - name: ProcessOrder
      namespace: com.acme.order
      input: { type: com.acme.Order }
      output: { type: com.acme.Invoice }
    - name: ShipOrder
      namespace: com.acme.shipping
      input: { type: com.acme.Invoice }
      output: { type: com.acme.Shipment }
  aspects:
    - id: persistence
      position: after

runtime-mapping:
  layout: monolith
  modules:
    app: {}
"#;
