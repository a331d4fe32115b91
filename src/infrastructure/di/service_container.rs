//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::TypeAnalysisService;
use crate::config::Settings;
use crate::infrastructure::scene::JsonFileSource;
use crate::infrastructure::traits::{Annotator, FileSystem, RealFileSystem, TreeSource};

/// Container holding shared dependencies and building services from them.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Host annotation sink
    pub annotator: Arc<dyn Annotator>,
}

impl ServiceContainer {
    /// Create a new service container with the real filesystem.
    pub fn new(settings: Settings, annotator: Arc<dyn Annotator>) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), annotator)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        annotator: Arc<dyn Annotator>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            annotator,
        }
    }

    /// Source reading the scene at `scene` with the configured instance type.
    pub fn scene_source(&self, scene: &Path) -> JsonFileSource {
        JsonFileSource::new(
            Arc::clone(&self.fs),
            scene,
            self.settings.instance_type.clone(),
        )
    }

    /// Analysis service for the scene file at `scene`.
    pub fn analysis_service(&self, scene: &Path) -> TypeAnalysisService {
        self.analysis_service_for(Arc::new(self.scene_source(scene)))
    }

    /// Analysis service over an arbitrary source.
    pub fn analysis_service_for(&self, source: Arc<dyn TreeSource>) -> TypeAnalysisService {
        TypeAnalysisService::new(
            source,
            Arc::clone(&self.annotator),
            Arc::clone(&self.settings),
        )
    }
}
