//! Migration class name generation.

use chrono::Utc;

use crate::metadata::Version;

/// Produces class names for new migrations.
pub trait ClassNameGenerator: Send + Sync {
    /// Generates a fully-qualified class name in the given namespace.
    fn generate_class_name(&self, namespace: &str) -> Version;
}

/// Generates `Version<timestamp>` class names from the current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampClassNameGenerator;

impl ClassNameGenerator for TimestampClassNameGenerator {
    fn generate_class_name(&self, namespace: &str) -> Version {
        let stamp = Utc::now().format("%Y%m%d%H%M%S");
        Version::new(namespace, format!("Version{stamp}"))
    }
}
