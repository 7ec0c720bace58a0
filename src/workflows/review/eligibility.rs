use super::domain::{Evaluator, Work};

/// Pure predicates deciding whether an (evaluator, work) pairing is legal.
///
/// Advisor conflicts key off name equality between the evaluator and the
/// work's advisor, a deliberately loose identity proxy; the comparison is
/// confined to this module so a future person-identity link replaces it
/// in one place.
pub(crate) struct EligibilityFilter<'a> {
    works: &'a [Work],
}

impl<'a> EligibilityFilter<'a> {
    pub(crate) fn new(works: &'a [Work]) -> Self {
        Self { works }
    }

    /// An evaluator may not judge a work they advise, nor any work sharing
    /// a subarea with one of their advised works.
    pub(crate) fn can_evaluate(&self, evaluator: &Evaluator, work: &Work) -> bool {
        if evaluator.name == work.advisor {
            return false;
        }
        !self
            .works
            .iter()
            .any(|advised| advised.advisor == evaluator.name && advised.subarea == work.subarea)
    }

    /// Area-of-expertise match between evaluator and work.
    pub(crate) fn has_expertise(&self, evaluator: &Evaluator, work: &Work) -> bool {
        evaluator.area == work.area
    }

    /// Expertise plus a declared interest in the work's subarea.
    pub(crate) fn has_subarea_interest(&self, evaluator: &Evaluator, work: &Work) -> bool {
        self.has_expertise(evaluator, work) && evaluator.subareas.contains(&work.subarea)
    }
}
