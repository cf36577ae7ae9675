const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    pub threshold: f64,
    pub margin: f64,
}

impl ConfidenceGate {
    pub fn new(threshold: f64, margin: f64) -> Self {
        Self { threshold, margin }
    }

    /// Both bounds are inclusive. A margin of zero degrades to threshold-only.
    pub fn evaluate(&self, top_score: f64, second_score: f64) -> GateDecision {
        let confident = top_score + EPSILON >= self.threshold;
        let separated = (top_score - second_score) + EPSILON >= self.margin;
        if confident && separated {
            GateDecision::Accept
        } else {
            GateDecision::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ConfidenceGate {
        ConfidenceGate::new(0.75, 0.15)
    }

    #[test]
    fn boundary_values_are_accepted() {
        assert_eq!(gate().evaluate(0.75, 0.60), GateDecision::Accept);
        assert_eq!(gate().evaluate(0.90, 0.75), GateDecision::Accept);
    }

    #[test]
    fn just_below_threshold_is_rejected() {
        assert_eq!(gate().evaluate(0.75 - 1e-6, 0.0), GateDecision::Reject);
    }

    #[test]
    fn narrow_margin_is_rejected() {
        assert_eq!(gate().evaluate(0.80, 0.70), GateDecision::Reject);
    }

    #[test]
    fn clear_winner_is_accepted() {
        assert_eq!(gate().evaluate(0.95, 0.02), GateDecision::Accept);
    }

    #[test]
    fn zero_margin_uses_threshold_alone() {
        let gate = ConfidenceGate::new(0.75, 0.0);
        assert_eq!(gate.evaluate(0.76, 0.76), GateDecision::Accept);
        assert_eq!(gate.evaluate(0.74, 0.0), GateDecision::Reject);
    }
}
