use std::borrow::Cow;

use sprawl_core::{Aabb, ChunkContent, ChunkPos, ObjectKind, PlacedObject, RoadSegment};

use crate::SpatialIndex;

/// How serious a [`Violation`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The violation is informational only and never blocks a placement.
    Warning,
    /// The violation blocks the placement.
    Error,
}

/// A placement rule that a candidate object breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The name of the rule that reported the violation.
    pub rule: Cow<'static, str>,
    /// A human-readable description of the problem.
    pub message: String,
    /// Whether the violation blocks the placement.
    pub severity: Severity,
}

impl Violation {
    /// Creates a new blocking [`Violation`].
    #[inline]
    pub fn error(rule: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a new informational [`Violation`].
    #[inline]
    pub fn warning(rule: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Returns whether the violation blocks the placement.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity} [{}]: {}", self.rule, self.message)
    }
}

/// A read-only view of a chunk that was already loaded when another chunk started generating.
///
/// This is a borrowed snapshot: it is only valid for one generation pass and is never stored
/// on the chunk being generated.
#[derive(Debug, Clone, Copy)]
pub struct AdjacentChunk<'a> {
    /// The position of the adjacent chunk.
    pub pos: ChunkPos,
    /// The content of the adjacent chunk.
    pub content: &'a ChunkContent,
}

/// Everything a [`PlacementRule`] may look at, besides the spatial index.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    /// The chunk the candidate object would belong to.
    pub chunk: ChunkPos,
    /// The side of a chunk, in world units.
    pub chunk_size: f32,
    /// The roads of the chunk generated so far.
    pub roads: &'a [RoadSegment],
    /// The already-loaded chunks surrounding the chunk.
    pub adjacent: &'a [AdjacentChunk<'a>],
}

impl<'a> PlacementContext<'a> {
    /// Returns the world-space bounds of the chunk.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.chunk.bounds(self.chunk_size)
    }
}

/// A named predicate that accepts or rejects the placement of a candidate object.
///
/// Rules are evaluated independently of each other. A placement is valid when no applicable
/// rule reports an [`Error`](Severity::Error).
pub trait PlacementRule: Send + Sync {
    /// Returns the name of the rule.
    ///
    /// Registering a rule replaces any rule with the same name.
    fn name(&self) -> &str;

    /// Returns the kinds of objects the rule applies to.
    ///
    /// An empty list means that the rule applies to every kind.
    fn applies_to(&self) -> &[ObjectKind] {
        &[]
    }

    /// Checks whether `object` may be placed.
    ///
    /// `index` contains the objects committed so far in the current generation pass.
    fn check(
        &self,
        object: &PlacedObject,
        ctx: &PlacementContext,
        index: &SpatialIndex,
    ) -> Option<Violation>;
}

/// Returns whether `rule` should be checked against objects of the provided kind.
#[inline]
pub fn rule_applies(rule: &dyn PlacementRule, kind: ObjectKind) -> bool {
    let kinds = rule.applies_to();
    kinds.is_empty() || kinds.contains(&kind)
}
