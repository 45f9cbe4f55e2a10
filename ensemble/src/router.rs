use clusens_stream::{Region, Snapshot};

/// Returns the identity of the first region, in snapshot order, whose
/// inclusion degree for `features` is positive.
///
/// This is first-match, not best-match: a later region with a higher
/// degree never wins over an earlier one.
pub fn route<'a, R: Region>(snapshot: &'a Snapshot<R>, features: &[f64]) -> Option<&'a str> {
    snapshot
        .iter()
        .find(|r| r.inclusion_degree(features) > 0.0)
        .map(|r| r.id())
}

/// Returns every distinct region identity with positive inclusion degree,
/// in snapshot order.
pub fn qualifying<'a, R: Region>(snapshot: &'a Snapshot<R>, features: &[f64]) -> Vec<&'a str> {
    let mut ids: Vec<&'a str> = Vec::new();
    for r in snapshot {
        if r.inclusion_degree(features) > 0.0 {
            let id = r.id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Weighted(&'static str, f64);

    impl Region for Weighted {
        fn id(&self) -> &str {
            self.0
        }

        fn inclusion_degree(&self, _features: &[f64]) -> f64 {
            self.1
        }
    }

    #[test]
    fn empty_snapshot_routes_nowhere() {
        let snap: Snapshot<Weighted> = Snapshot::empty();
        assert_eq!(route(&snap, &[0.0]), None);
        assert!(qualifying(&snap, &[0.0]).is_empty());
    }

    #[test]
    fn first_match_beats_best_match() {
        let snap = Snapshot::new(vec![Weighted("a", 0.0), Weighted("b", 0.2), Weighted("c", 0.9)]);
        assert_eq!(route(&snap, &[0.0]), Some("b"));
    }

    #[test]
    fn zero_and_nan_degrees_do_not_qualify() {
        let snap = Snapshot::new(vec![Weighted("a", 0.0), Weighted("b", f64::NAN)]);
        assert_eq!(route(&snap, &[0.0]), None);
        assert!(qualifying(&snap, &[0.0]).is_empty());
    }

    #[test]
    fn qualifying_keeps_order_and_deduplicates() {
        let snap = Snapshot::new(vec![
            Weighted("c", 1.0),
            Weighted("a", 0.0),
            Weighted("b", 0.5),
            Weighted("c", 1.0),
        ]);
        assert_eq!(qualifying(&snap, &[0.0]), vec!["c", "b"]);
    }
}
