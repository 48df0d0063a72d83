//! Dependency filtering functionality

use crate::toml_parser::DependencyType;

/// Decides which dependency kinds count as project edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyFilter {
    exclude_dev: bool,
    exclude_build: bool,
    exclude_target: bool,
}

impl DependencyFilter {
    /// Create a new dependency filter
    pub fn new(exclude_dev: bool, exclude_build: bool, exclude_target: bool) -> Self {
        Self {
            exclude_dev,
            exclude_build,
            exclude_target,
        }
    }

    /// Check if dev dependencies should be included
    pub fn include_dev(&self) -> bool {
        !self.exclude_dev
    }

    /// Check if build dependencies should be included
    pub fn include_build(&self) -> bool {
        !self.exclude_build
    }

    /// Check if target-specific dependencies should be included
    pub fn include_target(&self) -> bool {
        !self.exclude_target
    }

    /// Check if a dependency of the given kind should become an edge.
    ///
    /// A target-specific dev dependency is dropped by either exclusion.
    pub fn should_include(&self, dep_type: &DependencyType) -> bool {
        if dep_type.is_dev() && self.exclude_dev {
            return false;
        }
        if dep_type.is_build() && self.exclude_build {
            return false;
        }
        if dep_type.is_target_specific() && self.exclude_target {
            return false;
        }
        true
    }
}

impl From<&crate::common::CommonArgs> for DependencyFilter {
    fn from(args: &crate::common::CommonArgs) -> Self {
        Self::new(args.exclude_dev, args.exclude_build, args.exclude_target)
    }
}
