//! Weighted accumulator shared by the sector and band breakdowns

use crate::Pounds;

/// Baseline vs reform totals for one bucket, summed across all years
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateImpact {
    pub baseline_revenue: Pounds,
    pub reform_revenue: Pounds,
    /// Weighted count of firm-years whose liability changed
    pub firms_affected: f64,
}

impl AggregateImpact {
    /// Add one firm-year observation
    pub fn record(&mut self, baseline: Pounds, reform: Pounds, weight: f64) {
        self.baseline_revenue += baseline * weight;
        self.reform_revenue += reform * weight;
        if baseline != reform {
            self.firms_affected += weight;
        }
    }

    pub fn revenue_delta(&self) -> Pounds {
        self.reform_revenue - self.baseline_revenue
    }

    pub fn is_finite(&self) -> bool {
        self.baseline_revenue.is_finite() && self.reform_revenue.is_finite() && self.firms_affected.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_changed_only() {
        let mut agg = AggregateImpact::default();
        agg.record(Pounds(100.0), Pounds(100.0), 2.0);
        agg.record(Pounds(50.0), Pounds(0.0), 3.0);

        assert_eq!(agg.baseline_revenue, Pounds(350.0));
        assert_eq!(agg.reform_revenue, Pounds(200.0));
        assert_eq!(agg.revenue_delta(), Pounds(-150.0));
        assert_eq!(agg.firms_affected, 3.0);
    }
}
