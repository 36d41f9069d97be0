use sprawl_core::{ObjectKind, PlacedObject};

use crate::{PlacementContext, PlacementRule, Severity, SpatialIndex, Violation};

/// Requires objects of one kind to keep a minimum center-to-center distance between them.
#[derive(Debug, Clone)]
pub struct MinimumSpacing {
    name: String,
    kinds: [ObjectKind; 1],
    distance: f32,
    severity: Severity,
}

impl MinimumSpacing {
    /// Creates a new [`MinimumSpacing`] rule reporting errors.
    ///
    /// The rule is named after the kind it applies to, so that registering a second spacing
    /// rule for the same kind replaces the first one.
    pub fn new(kind: ObjectKind, distance: f32) -> Self {
        Self {
            name: format!("minimum_spacing_{kind}"),
            kinds: [kind],
            distance: distance.max(0.0),
            severity: Severity::Error,
        }
    }

    /// Sets the severity of the violations reported by the rule.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the minimum distance enforced by the rule.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl PlacementRule for MinimumSpacing {
    fn name(&self) -> &str {
        &self.name
    }

    fn applies_to(&self) -> &[ObjectKind] {
        &self.kinds
    }

    fn check(
        &self,
        object: &PlacedObject,
        _ctx: &PlacementContext,
        index: &SpatialIndex,
    ) -> Option<Violation> {
        let p = object.position;
        let other = index
            .query_near(p.x, p.y, self.distance)
            .into_iter()
            .filter(|o| o.kind == self.kinds[0])
            .find(|o| o.position.distance(p) < self.distance)?;

        Some(Violation {
            rule: self.name.clone().into(),
            message: format!(
                "{} is {:.2} away from {} (minimum {:.2})",
                object.id,
                other.position.distance(p),
                other.id,
                self.distance,
            ),
            severity: self.severity,
        })
    }
}
