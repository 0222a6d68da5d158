//! Explicit status filters and the default exclusion of transient states.

use crate::criteria::{CriterionValue, SearchCriteria};
use crate::search::Predicate;

/// `column NOT IN (transient)`, applied when no explicit status is requested.
#[derive(Debug, Clone, Copy)]
pub struct StatusExclusion {
    pub column: &'static str,
    pub transient: &'static [i64],
}

impl StatusExclusion {
    /// `None` when the transient set is empty.
    pub fn predicate(&self) -> Option<Predicate> {
        if self.transient.is_empty() {
            None
        } else {
            Some(Predicate::not_in(self.column, self.transient.iter().copied()))
        }
    }
}

/// Status handling for one search domain.
///
/// A non-empty explicit selection replaces the default exclusion entirely, so
/// transient states can still be searched for on purpose.
#[derive(Debug, Clone, Copy)]
pub struct StatusPolicy {
    /// Criterion carrying the explicit status selection.
    pub key: &'static str,
    pub exclusion: StatusExclusion,
    /// Maps one selected value (id or name) to a status id.
    pub resolve: fn(&CriterionValue) -> Option<i64>,
}

impl StatusPolicy {
    /// Status ids selected in `criteria`; unresolvable members are skipped.
    pub fn selected(&self, criteria: &SearchCriteria) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for value in criteria.list(self.key) {
            match (self.resolve)(value) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => log::debug!("ignoring unknown {} value {value:?}", self.key),
            }
        }
        ids
    }

    pub fn predicate(&self, criteria: &SearchCriteria) -> Option<Predicate> {
        let selected = self.selected(criteria);
        if selected.is_empty() {
            self.exclusion.predicate()
        } else {
            Some(Predicate::in_list(self.exclusion.column, selected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROCESSING: i64 = 8;
    const PENDING: i64 = 7;
    const DELIVERED: i64 = 5;

    fn resolve(value: &CriterionValue) -> Option<i64> {
        match value {
            CriterionValue::Integer(id) => Some(*id),
            CriterionValue::Text(name) if name == "delivered" => Some(DELIVERED),
            _ => None,
        }
    }

    const POLICY: StatusPolicy = StatusPolicy {
        key: "status",
        exclusion: StatusExclusion {
            column: "o.order_status_id",
            transient: &[PROCESSING, PENDING],
        },
        resolve,
    };

    #[test]
    fn excludes_transient_states_by_default() {
        let predicate = POLICY.predicate(&SearchCriteria::new());
        assert_eq!(
            predicate,
            Some(Predicate::not_in("o.order_status_id", [PROCESSING, PENDING]))
        );
    }

    #[test]
    fn explicit_selection_replaces_exclusion() {
        let criteria =
            SearchCriteria::new().with("status", vec![CriterionValue::from("delivered")]);
        assert_eq!(
            POLICY.predicate(&criteria),
            Some(Predicate::in_list("o.order_status_id", [DELIVERED]))
        );
    }

    #[test]
    fn transient_states_can_be_requested_explicitly() {
        let criteria = SearchCriteria::new().with("status", vec![PROCESSING, PROCESSING]);
        assert_eq!(
            POLICY.predicate(&criteria),
            Some(Predicate::in_list("o.order_status_id", [PROCESSING]))
        );
    }

    #[test]
    fn unresolvable_selection_keeps_default_exclusion() {
        let criteria = SearchCriteria::new().with("status", vec!["archived"]);
        assert_eq!(
            POLICY.predicate(&criteria),
            Some(Predicate::not_in("o.order_status_id", [PROCESSING, PENDING]))
        );
    }

    #[test]
    fn empty_transient_set_adds_nothing() {
        let exclusion = StatusExclusion {
            column: "c.customer_status_id",
            transient: &[],
        };
        assert!(exclusion.predicate().is_none());
    }
}
