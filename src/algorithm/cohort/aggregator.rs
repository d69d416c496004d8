//! Aggregation of classified encounters into report rows

use std::collections::BTreeMap;

use crate::models::dimension::{Dimension, UNASSIGNED_LABEL};
use crate::models::encounter::ClassifiedEncounter;
use crate::models::period::PeriodKey;
use crate::models::report::{CohortFlowRow, Metric, ReportRow};

type GroupKey = (PeriodKey, Option<String>);

fn group_key(classified: &ClassifiedEncounter, dimension: Option<Dimension>) -> GroupKey {
    let value = dimension.map(|dimension| {
        classified
            .encounter
            .dimension_value(dimension)
            .unwrap_or(UNASSIGNED_LABEL)
            .to_string()
    });
    (classified.encounter.period, value)
}

/// Sum one metric per `(period[, dimension value])` group
///
/// Rows come out sorted by period, then by dimension value. Every group
/// present in the input gets a row, including groups that sum to zero.
/// Encounters without a value for `dimension` are counted under
/// [`UNASSIGNED_LABEL`], so the per-value rows of a period always add up to
/// the global row.
pub fn aggregate<'a, I>(
    encounters: I,
    dimension: Option<Dimension>,
    metric: Metric,
) -> Vec<ReportRow>
where
    I: IntoIterator<Item = &'a ClassifiedEncounter>,
{
    let mut groups: BTreeMap<GroupKey, u64> = BTreeMap::new();
    for classified in encounters {
        *groups.entry(group_key(classified, dimension)).or_insert(0) +=
            metric.count(&classified.flags);
    }

    groups
        .into_iter()
        .map(|((period, dimension_value), value)| ReportRow {
            period,
            dimension_value,
            value,
        })
        .collect()
}

/// Sum all three metrics per group in a single pass
pub fn aggregate_all<'a, I>(encounters: I, dimension: Option<Dimension>) -> Vec<CohortFlowRow>
where
    I: IntoIterator<Item = &'a ClassifiedEncounter>,
{
    let mut groups: BTreeMap<GroupKey, CohortFlowRow> = BTreeMap::new();
    for classified in encounters {
        let key = group_key(classified, dimension);
        groups
            .entry(key)
            .or_insert_with_key(|(period, value)| CohortFlowRow::new(*period, value.clone()))
            .add(&classified.flags);
    }

    groups.into_values().collect()
}
