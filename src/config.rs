//! The configuration of the chunk manager.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sprawl_placement::rules::BoundaryIntegrity;
use sprawl_worldgen_core::{Params, Registry};
use sprawl_worldgen_std::{RoadGenerator, DEFAULT_ORDER};

use crate::error::ConfigurationError;

/// The configuration of a [`ChunkManager`](crate::ChunkManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// The side of a chunk, in world units.
    pub chunk_size: f32,
    /// The distance within which chunks must be loaded.
    pub active_radius: f32,
    /// The distance beyond which loaded chunks are evicted.
    pub unload_distance: f32,
    /// The seed of the world.
    pub seed: i64,
    /// The names of the generators to run on every chunk, in order.
    pub generation_order: Vec<String>,
    /// The generator whose failure aborts the generation of a chunk.
    pub critical_generator: String,
    /// The parameters handed to each generator, by name.
    pub generators: BTreeMap<String, Params>,
    /// Observer coordinates are clamped to `[-max_world_coordinate, max_world_coordinate]`.
    pub max_world_coordinate: f32,
    /// The margin used to look for duplicates across chunk boundaries.
    pub boundary_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100.0,
            active_radius: 200.0,
            unload_distance: 300.0,
            seed: 12345,
            generation_order: DEFAULT_ORDER.iter().map(|&s| s.to_owned()).collect(),
            critical_generator: RoadGenerator::NAME.to_owned(),
            generators: BTreeMap::new(),
            max_world_coordinate: 1e7,
            boundary_margin: BoundaryIntegrity::DEFAULT_MARGIN,
        }
    }
}

/// One problem found in a [`WorldConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// The field the issue is about.
    pub field: String,
    /// Describes the issue.
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.field, self.message)
    }
}

/// The result of [`WorldConfig::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Issues that make the configuration unusable.
    pub errors: Vec<ConfigIssue>,
    /// Suspicious values that do not prevent the configuration from being used.
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationReport {
    /// Returns whether the configuration can be used.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ConfigIssue::new(field, message));
    }

    fn warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue::new(field, message));
    }
}

impl WorldConfig {
    /// Parses a configuration from RON text.
    ///
    /// Missing fields take their default value.
    pub fn from_ron(text: &str) -> Result<Self, ConfigurationError> {
        Ok(ron::from_str(text)?)
    }

    /// Loads a configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let file = std::fs::File::open(path)?;
        Ok(ron::de::from_reader(file)?)
    }

    /// Returns the largest chunk coordinate, in absolute value, that an update may visit: the
    /// chunk of the farthest observer, its scan reach, and the neighbors of the chunks it loads.
    fn grid_extent(&self) -> f64 {
        let size = self.chunk_size as f64;
        let reach = (self.active_radius as f64 / size).ceil();
        (self.max_world_coordinate as f64 / size).ceil() + reach + 1.0
    }

    /// Checks the configuration against the generators available in `registry`.
    pub fn validate(&self, registry: &Registry) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !self.chunk_size.is_finite() || self.chunk_size <= 0.0 {
            report.error("chunk_size", "must be a positive number");
        } else if self.chunk_size < 16.0 {
            report.warning("chunk_size", "is unusually small");
        } else if self.chunk_size > 4096.0 {
            report.warning("chunk_size", "is unusually large");
        }

        if !self.active_radius.is_finite() || self.active_radius <= 0.0 {
            report.error("active_radius", "must be a positive number");
        } else if self.chunk_size.is_finite() && self.active_radius < self.chunk_size {
            report.warning("active_radius", "is smaller than a chunk");
        }

        if !self.unload_distance.is_finite() || self.unload_distance <= self.active_radius {
            report.error("unload_distance", "must be greater than `active_radius`");
        } else if self.unload_distance > 4.0 * self.active_radius {
            report.warning(
                "unload_distance",
                "is more than four times `active_radius`",
            );
        }

        if !self.max_world_coordinate.is_finite() || self.max_world_coordinate <= 0.0 {
            report.error("max_world_coordinate", "must be a positive number");
        } else if self.chunk_size.is_finite()
            && self.chunk_size > 0.0
            && self.active_radius.is_finite()
            && self.active_radius > 0.0
            && self.grid_extent() > i32::MAX as f64
        {
            report.error(
                "max_world_coordinate",
                "reaches chunks beyond the addressable grid for this `chunk_size`",
            );
        }

        if !self.boundary_margin.is_finite() || self.boundary_margin < 0.0 {
            report.error("boundary_margin", "must not be negative");
        }

        if self.generation_order.is_empty() {
            report.error("generation_order", "must name at least one generator");
        }
        for (i, name) in self.generation_order.iter().enumerate() {
            if self.generation_order[..i].contains(name) {
                report.error("generation_order", format!("lists `{name}` twice"));
            }
            if !registry.contains(name) {
                report.error("generation_order", format!("names unknown generator `{name}`"));
            }
        }

        if !self.generation_order.contains(&self.critical_generator) {
            report.error(
                "critical_generator",
                format!("`{}` is not part of `generation_order`", self.critical_generator),
            );
        }

        for name in self.generators.keys() {
            if !registry.contains(name) {
                report.error("generators", format!("configures unknown generator `{name}`"));
            } else if !self.generation_order.contains(name) {
                report.warning(
                    "generators",
                    format!("configures `{name}`, which never runs"),
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use sprawl_core::Value;
    use sprawl_worldgen_std::standard_registry;

    use super::*;

    fn fields(issues: &[ConfigIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn default_configuration_is_valid() {
        let report = WorldConfig::default().validate(&standard_registry());
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn fatal_issues() {
        let registry = standard_registry();

        let config = WorldConfig {
            chunk_size: 0.0,
            ..WorldConfig::default()
        };
        assert_eq!(fields(&config.validate(&registry).errors), ["chunk_size"]);

        let config = WorldConfig {
            chunk_size: f32::NAN,
            ..WorldConfig::default()
        };
        assert!(!config.validate(&registry).is_valid());

        let config = WorldConfig {
            unload_distance: 200.0,
            ..WorldConfig::default()
        };
        assert_eq!(fields(&config.validate(&registry).errors), ["unload_distance"]);

        let config = WorldConfig {
            generation_order: Vec::new(),
            ..WorldConfig::default()
        };
        assert_eq!(
            fields(&config.validate(&registry).errors),
            ["generation_order", "critical_generator"]
        );

        let config = WorldConfig {
            generation_order: vec!["roads".into(), "roads".into(), "bridges".into()],
            ..WorldConfig::default()
        };
        assert_eq!(config.validate(&registry).errors.len(), 2);
    }

    #[test]
    fn the_grid_bounds_the_world() {
        let registry = standard_registry();

        let config = WorldConfig {
            max_world_coordinate: 1e30,
            ..WorldConfig::default()
        };
        assert_eq!(
            fields(&config.validate(&registry).errors),
            ["max_world_coordinate"]
        );

        let config = WorldConfig {
            chunk_size: 0.001,
            active_radius: 0.002,
            unload_distance: 0.004,
            ..WorldConfig::default()
        };
        assert_eq!(
            fields(&config.validate(&registry).errors),
            ["max_world_coordinate"]
        );

        let config = WorldConfig {
            chunk_size: 0.001,
            active_radius: 0.002,
            unload_distance: 0.004,
            max_world_coordinate: 1e5,
            ..WorldConfig::default()
        };
        assert!(config.validate(&registry).is_valid());
    }

    #[test]
    fn warnings_are_not_fatal() {
        let config = WorldConfig {
            chunk_size: 8.0,
            active_radius: 16.0,
            unload_distance: 100.0,
            ..WorldConfig::default()
        };
        let report = config.validate(&standard_registry());
        assert!(report.is_valid());
        assert_eq!(fields(&report.warnings), ["chunk_size", "unload_distance"]);
    }

    #[test]
    fn unknown_generator_parameters() {
        let mut config = WorldConfig::default();
        config.generators.insert("bridges".into(), Params::new());
        config.generation_order.retain(|n| n != "vehicles");
        config.generators.insert("vehicles".into(), Params::new());

        let report = config.validate(&standard_registry());
        assert_eq!(fields(&report.errors), ["generators"]);
        assert_eq!(fields(&report.warnings), ["generators"]);
    }

    #[test]
    fn parse_ron() {
        let config = WorldConfig::from_ron(
            r#"(
                chunk_size: 64.0,
                seed: -7,
                generation_order: ["terrain", "roads"],
                generators: {
                    "roads": { "grid_spacing": 32.0, "main_lanes": 2 },
                },
            )"#,
        )
        .unwrap();

        assert_eq!(config.chunk_size, 64.0);
        assert_eq!(config.seed, -7);
        assert_eq!(config.active_radius, 200.0);
        assert_eq!(config.generation_order, ["terrain", "roads"]);
        assert_eq!(
            config.generators["roads"].get("main_lanes"),
            Some(&Value::Int(2))
        );
        assert_eq!(
            config.generators["roads"].get("grid_spacing"),
            Some(&Value::Float(32.0))
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = WorldConfig::from_ron("(chunk_sise: 64.0)").unwrap_err();
        assert!(matches!(err, ConfigurationError::Parse(_)));
    }
}
