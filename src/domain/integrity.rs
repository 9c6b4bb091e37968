use std::fmt;

use super::{Estimate, EstimateId, EstimateTotals, format_amount};

/// Count of rows whose foreign key points at a record that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanCount {
    /// Relation in `table.column -> table` form.
    pub relation: &'static str,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    TotalsDrift {
        estimate_id: EstimateId,
        stored: EstimateTotals,
        expected: EstimateTotals,
    },
    /// Line items or labour whose totals no longer fit in an amount.
    TotalsOutOfRange {
        estimate_id: EstimateId,
        field: &'static str,
    },
    OrphanedReferences {
        relation: &'static str,
        count: i64,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::TotalsDrift {
                estimate_id,
                stored,
                expected,
            } => write!(
                f,
                "Estimate {} totals drifted: stored {} / {} / {}, expected {} / {} / {}",
                estimate_id,
                format_amount(stored.total_materials_cost),
                format_amount(stored.total_hourly_cost),
                format_amount(stored.total_estimate_cost),
                format_amount(expected.total_materials_cost),
                format_amount(expected.total_hourly_cost),
                format_amount(expected.total_estimate_cost),
            ),
            IntegrityIssue::TotalsOutOfRange { estimate_id, field } => {
                write!(f, "Estimate {} {} is out of range", estimate_id, field)
            }
            IntegrityIssue::OrphanedReferences { relation, count } => {
                write!(f, "{} row(s) with dangling reference {}", count, relation)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    pub estimate_count: usize,
    pub line_item_count: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compare every estimate's stored totals with its line items and collect
/// any dangling references.
pub fn build_integrity_report(estimates: &[Estimate], orphans: &[OrphanCount]) -> IntegrityReport {
    let mut issues = Vec::new();

    for estimate in estimates {
        let stored = estimate.totals();
        match estimate.expected_totals() {
            Ok(expected) if expected != stored => issues.push(IntegrityIssue::TotalsDrift {
                estimate_id: estimate.estimate_id,
                stored,
                expected,
            }),
            Ok(_) => {}
            Err(err) => issues.push(IntegrityIssue::TotalsOutOfRange {
                estimate_id: estimate.estimate_id,
                field: err.field,
            }),
        }
    }

    issues.extend(
        orphans
            .iter()
            .filter(|o| o.count > 0)
            .map(|o| IntegrityIssue::OrphanedReferences {
                relation: o.relation,
                count: o.count,
            }),
    );

    IntegrityReport {
        estimate_count: estimates.len(),
        line_item_count: estimates.iter().map(|e| e.materials.len()).sum(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::EstimateMaterial;

    fn estimate_with_line(stored_materials: i64) -> Estimate {
        let now = Utc::now();
        Estimate {
            estimate_id: 1,
            client_id: 1,
            status: "pending".into(),
            estimated_hours: Decimal::from(10),
            estimated_hourly_rate: Decimal::from(50),
            total_materials_cost: Decimal::from(stored_materials),
            total_hourly_cost: Decimal::from(500),
            total_estimate_cost: Decimal::from(500 + stored_materials),
            scheduled_date: None,
            date_created: now,
            date_updated: now,
            materials: vec![EstimateMaterial {
                material_id: 1,
                estimate_id: 1,
                description: "Tube".into(),
                quantity: Decimal::from(2),
                unit_cost: Decimal::from(25),
                total_cost: Decimal::from(50),
            }],
        }
    }

    #[test]
    fn test_consistent_estimate_is_healthy() {
        let report = build_integrity_report(&[estimate_with_line(50)], &[]);
        assert!(report.is_healthy());
        assert_eq!(report.estimate_count, 1);
        assert_eq!(report.line_item_count, 1);
    }

    #[test]
    fn test_drift_detected() {
        let report = build_integrity_report(&[estimate_with_line(40)], &[]);
        assert_eq!(report.issues.len(), 1);
        assert!(matches!(
            report.issues[0],
            IntegrityIssue::TotalsDrift { estimate_id: 1, .. }
        ));
    }

    #[test]
    fn test_overflowing_totals_reported() {
        let mut estimate = estimate_with_line(50);
        estimate.estimated_hours = Decimal::MAX;
        estimate.estimated_hourly_rate = Decimal::from(2);

        let report = build_integrity_report(&[estimate], &[]);
        assert_eq!(
            report.issues,
            vec![IntegrityIssue::TotalsOutOfRange {
                estimate_id: 1,
                field: "total_hourly_cost"
            }]
        );
    }

    #[test]
    fn test_only_nonzero_orphans_reported() {
        let orphans = [
            OrphanCount {
                relation: "jobs.client_account_id -> clients",
                count: 0,
            },
            OrphanCount {
                relation: "materials.vendor_id -> vendors",
                count: 2,
            },
        ];
        let report = build_integrity_report(&[], &orphans);
        assert_eq!(
            report.issues,
            vec![IntegrityIssue::OrphanedReferences {
                relation: "materials.vendor_id -> vendors",
                count: 2
            }]
        );
        assert_eq!(
            report.issues[0].to_string(),
            "2 row(s) with dangling reference materials.vendor_id -> vendors"
        );
    }
}
