pub mod builder;
pub mod config;
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod importer;
pub mod logging;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod signature;

pub use config::ImportConfig;
pub use dependency::{ClassDependencyGraph, DependencyKind};
pub use error::{ImportError, Result};
pub use graph::ClassGraph;
pub use importer::ClassImporter;
pub use registry::ClassRegistry;
pub use resolver::{HierarchyResolver, TargetResolver};
