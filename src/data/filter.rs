use std::collections::BTreeMap;

use super::model::{CellValue, SeriesPoint, SubjectId, TabularDataset};

// ---------------------------------------------------------------------------
// Row filters
// ---------------------------------------------------------------------------

/// Rows whose `id_column` equals `subject`, in source order.
///
/// A dataset without the identifier column yields an empty table with the
/// same header. The source is never modified.
pub fn filter_by_subject(
    dataset: &TabularDataset,
    id_column: &str,
    subject: SubjectId,
) -> TabularDataset {
    let Some(idx) = dataset.column_index(id_column) else {
        return TabularDataset::new(dataset.columns.clone(), Vec::new());
    };
    filter_rows(dataset, |row| row[idx].matches_id(subject))
}

/// Rows for which `keep` returns true, in source order.
pub fn filter_rows<F>(dataset: &TabularDataset, mut keep: F) -> TabularDataset
where
    F: FnMut(&[CellValue]) -> bool,
{
    TabularDataset {
        columns: dataset.columns.clone(),
        rows: dataset
            .rows
            .iter()
            .filter(|row| keep(row))
            .cloned()
            .collect(),
    }
}

/// Rows whose numeric `column` value is strictly below `limit`.
/// Rows with a non-numeric cell are dropped.
pub fn filter_below(dataset: &TabularDataset, column: &str, limit: f64) -> TabularDataset {
    let Some(idx) = dataset.column_index(column) else {
        return TabularDataset::new(dataset.columns.clone(), Vec::new());
    };
    filter_rows(dataset, |row| row[idx].as_f64().is_some_and(|v| v < limit))
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Project rows onto `(time, value)` pairs in source order.
///
/// Rows where either cell is not numeric are skipped; an absent column
/// yields no points.
pub fn project_series(
    dataset: &TabularDataset,
    time_column: &str,
    value_column: &str,
) -> Vec<SeriesPoint> {
    let (Some(t_idx), Some(v_idx)) = (
        dataset.column_index(time_column),
        dataset.column_index(value_column),
    ) else {
        return Vec::new();
    };
    dataset
        .rows
        .iter()
        .filter_map(|row| Some(SeriesPoint::new(row[t_idx].as_f64()?, row[v_idx].as_f64()?)))
        .collect()
}

/// Numeric values of one column in source order, skipping non-numeric cells.
pub fn numeric_column(dataset: &TabularDataset, column: &str) -> Vec<f64> {
    dataset
        .column(column)
        .map(|values| values.filter_map(CellValue::as_f64).collect())
        .unwrap_or_default()
}

/// One series per distinct value of the pivot column.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSeries {
    pub key: CellValue,
    pub points: Vec<SeriesPoint>,
}

/// Pivot `values` by `columns` over the `index` column.
///
/// Duplicate `(index, column)` pairs are averaged, each series is sorted by
/// index and series come out ordered by pivot key. Rows with a non-numeric
/// index or value are ignored.
pub fn pivot_mean(
    dataset: &TabularDataset,
    index: &str,
    columns: &str,
    values: &str,
) -> Vec<PivotSeries> {
    let (Some(i_idx), Some(c_idx), Some(v_idx)) = (
        dataset.column_index(index),
        dataset.column_index(columns),
        dataset.column_index(values),
    ) else {
        return Vec::new();
    };

    // key → (index bits → (sum, count)); f64 keys go through total ordering.
    let mut groups: BTreeMap<CellValue, BTreeMap<OrderedTime, (f64, usize)>> = BTreeMap::new();
    for row in &dataset.rows {
        let (Some(t), Some(v)) = (row[i_idx].as_f64(), row[v_idx].as_f64()) else {
            continue;
        };
        let acc = groups
            .entry(row[c_idx].clone())
            .or_default()
            .entry(OrderedTime(t))
            .or_insert((0.0, 0));
        acc.0 += v;
        acc.1 += 1;
    }

    groups
        .into_iter()
        .map(|(key, by_time)| PivotSeries {
            key,
            points: by_time
                .into_iter()
                .map(|(t, (sum, n))| SeriesPoint::new(t.0, sum / n as f64))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedTime(f64);

impl Eq for OrderedTime {}

impl PartialOrd for OrderedTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    fn throughput() -> TabularDataset {
        read_csv(
            "Time,UE_ID,Throughput_Mbps\n\
             0.1,1,3.0\n0.1,2,2.0\n0.2,1,3.1\n0.2,3,2.9\n0.3,2,1.5\n0.3,1,2.8\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn subject_filter_preserves_order() {
        let ds = throughput();
        let ue1 = filter_by_subject(&ds, "UE_ID", 1);
        let times = numeric_column(&ue1, "Time");
        assert_eq!(times, [0.1, 0.2, 0.3]);

        // Restricting the source to matching rows gives the same sequence.
        let expected: Vec<_> = ds
            .rows
            .iter()
            .filter(|r| r[1] == CellValue::Integer(1))
            .cloned()
            .collect();
        assert_eq!(ue1.rows, expected);
    }

    #[test]
    fn subject_filter_leaves_source_untouched() {
        let ds = throughput();
        let before = ds.clone();
        let _ = filter_by_subject(&ds, "UE_ID", 2);
        assert_eq!(ds, before);
    }

    #[test]
    fn unknown_subject_or_column_is_empty() {
        let ds = throughput();
        assert!(filter_by_subject(&ds, "UE_ID", 42).is_empty());
        let none = filter_by_subject(&ds, "IMSI", 1);
        assert!(none.is_empty());
        assert_eq!(none.columns, ds.columns);
    }

    #[test]
    fn projection_skips_non_numeric_rows() {
        let ds = read_csv("Time,SINR\n0.1,12.5\n0.2,\n0.3,n/a\n0.4,9\n".as_bytes()).unwrap();
        let pts = project_series(&ds, "Time", "SINR");
        assert_eq!(
            pts,
            [SeriesPoint::new(0.1, 12.5), SeriesPoint::new(0.4, 9.0)]
        );
        assert!(project_series(&ds, "Time", "RSRP").is_empty());
    }

    #[test]
    fn filter_below_is_strict() {
        let ds = read_csv("Time,SINR\n1,59.9\n2,60\n3,75\n4,-3\n".as_bytes()).unwrap();
        let kept = filter_below(&ds, "SINR", 60.0);
        assert_eq!(numeric_column(&kept, "Time"), [1.0, 4.0]);
    }

    #[test]
    fn pivot_averages_duplicates_and_sorts_by_index() {
        let ds = read_csv(
            "Time,IMSI,CellId,RSRP\n\
             0.2,2,1,-80\n0.1,2,1,-82\n0.1,2,2,-95\n0.2,2,1,-84\n"
                .as_bytes(),
        )
        .unwrap();
        let series = pivot_mean(&ds, "Time", "CellId", "RSRP");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key, CellValue::Integer(1));
        assert_eq!(
            series[0].points,
            [SeriesPoint::new(0.1, -82.0), SeriesPoint::new(0.2, -82.0)]
        );
        assert_eq!(series[1].key, CellValue::Integer(2));
        assert_eq!(series[1].points, [SeriesPoint::new(0.1, -95.0)]);
    }
}
