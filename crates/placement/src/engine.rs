use smallvec::SmallVec;

use sprawl_core::PlacedObject;

use crate::{rule_applies, PlacementContext, PlacementRule, SpatialIndex, Violation};

/// The default cell size of the engine's spatial index.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// The list of violations reported for a single candidate.
pub type Violations = SmallVec<[Violation; 2]>;

/// Validates candidate objects against a set of [`PlacementRule`]s.
///
/// # Committing
///
/// Checking a candidate has no side effect. Once a caller decides to keep a candidate, it must
/// register it with [`add_object`] (or use [`try_place`], which does both) so that later
/// candidates are checked against it.
///
/// [`add_object`]: PlacementEngine::add_object
/// [`try_place`]: PlacementEngine::try_place
pub struct PlacementEngine {
    /// The registered rules, in registration order.
    rules: Vec<Box<dyn PlacementRule>>,
    /// The objects committed so far.
    index: SpatialIndex,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl PlacementEngine {
    /// Creates a new [`PlacementEngine`] with no rule.
    pub fn new(cell_size: f32) -> Self {
        Self {
            rules: Vec::new(),
            index: SpatialIndex::new(cell_size),
        }
    }

    /// Registers a rule.
    ///
    /// A previously registered rule with the same name is replaced, keeping its position in the
    /// evaluation order.
    pub fn add_rule(&mut self, rule: Box<dyn PlacementRule>) {
        match self.rules.iter_mut().find(|r| r.name() == rule.name()) {
            Some(slot) => *slot = rule,
            None => self.rules.push(rule),
        }
    }

    /// Removes the rule with the provided name.
    ///
    /// Returns whether a rule was removed.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        self.rules.len() != before
    }

    /// Returns the names of the registered rules, in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name())
    }

    /// Runs every applicable rule against `object` and collects the violations they report.
    #[profiling::function]
    pub fn get_violations(&self, object: &PlacedObject, ctx: &PlacementContext) -> Violations {
        self.rules
            .iter()
            .filter(|rule| rule_applies(&***rule, object.kind))
            .filter_map(|rule| rule.check(object, ctx, &self.index))
            .collect()
    }

    /// Returns whether `object` may be placed: no applicable rule reports an error.
    ///
    /// Warnings never block a placement.
    pub fn is_valid_placement(&self, object: &PlacedObject, ctx: &PlacementContext) -> bool {
        !self
            .get_violations(object, ctx)
            .iter()
            .any(Violation::is_error)
    }

    /// Commits an object so that later candidates are checked against it.
    #[inline]
    pub fn add_object(&mut self, object: PlacedObject) {
        self.index.insert(object);
    }

    /// Checks `object` and commits a copy of it if the placement is valid.
    ///
    /// # Returns
    ///
    /// On success, the warnings reported for the object. On failure, every violation reported
    /// for the object (errors and warnings).
    pub fn try_place(
        &mut self,
        object: &PlacedObject,
        ctx: &PlacementContext,
    ) -> Result<Violations, Violations> {
        let violations = self.get_violations(object, ctx);

        for v in &violations {
            sprawl_log::trace!("{}: {v}", object.id);
        }

        if violations.iter().any(Violation::is_error) {
            return Err(violations);
        }

        self.add_object(object.clone());
        Ok(violations)
    }

    /// Returns the spatial index of the committed objects.
    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Returns the committed objects, in commit order.
    #[inline]
    pub fn objects(&self) -> std::slice::Iter<'_, PlacedObject> {
        self.index.iter()
    }

    /// Forgets every committed object. Rules are kept.
    pub fn clear(&mut self) {
        self.index.clear();
    }
}
