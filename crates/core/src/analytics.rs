//! Static market datasets behind the dashboard charts.
//!
//! Two kinds of CSV files are read once at startup:
//!
//! - `deals_<year>.csv`: one row per district, first column the district
//!   name, second column the number of deals that year. Header names vary
//!   between exports, so columns are read by position.
//! - the total-cost file: a wide table with one row per district and one
//!   column per year, melted into `(district, year, cost)` entries.
//!
//! Loading never fails as a whole. A missing or malformed file becomes a
//! [`DataWarning`] and the affected chart is skipped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

use crate::error::CoreError;

/// Default file name of the wide total-cost table.
pub const TOTAL_COST_FILE: &str = "total_cost.csv";

/// File name of the deal-count export for `year`.
pub fn deal_file_name(year: i32) -> String {
    format!("deals_{year}.csv")
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealCount {
    pub district: String,
    pub deals: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    pub district: String,
    pub year: i32,
    pub cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearDeals {
    pub year: i32,
    pub deals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearCost {
    pub year: i32,
    pub cost: f64,
}

/// A dataset that could not be used, shown to the user instead of its chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataWarning {
    pub file: String,
    pub message: String,
}

impl DataWarning {
    fn from_error(path: &Path, err: &CoreError) -> Self {
        Self {
            file: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, CoreError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CoreError::MissingDataFile(path.to_path_buf()),
        _ => malformed(path, format!("cannot open: {e}")),
    })
}

fn malformed(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::MalformedDataFile {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Counts may be exported as `12` or `12.0`.
fn parse_count(cell: &str) -> Option<u64> {
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    let f = cell.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

fn read_deal_rows<R: Read>(reader: R) -> Result<Vec<DealCount>, String> {
    let mut rdr = csv_reader(reader);
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        // Header is line 1.
        let line = idx + 2;
        let district = record.get(0).unwrap_or_default();
        if district.is_empty() {
            return Err(format!("line {line}: missing district"));
        }
        let cell = record
            .get(1)
            .ok_or_else(|| format!("line {line}: missing deal count"))?;
        let deals =
            parse_count(cell).ok_or_else(|| format!("line {line}: invalid deal count '{cell}'"))?;
        let total = totals.entry(district.to_string()).or_default();
        *total = total
            .checked_add(deals)
            .ok_or_else(|| format!("line {line}: deal count overflows"))?;
    }

    Ok(totals
        .into_iter()
        .map(|(district, deals)| DealCount { district, deals })
        .collect())
}

/// Total deals across `rows`, saturating at `u64::MAX`.
pub fn sum_deals(rows: &[DealCount]) -> u64 {
    rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.deals))
}

/// Parse an uploaded deal-count CSV. Duplicate districts are summed.
pub fn parse_deal_counts<R: Read>(reader: R) -> Result<Vec<DealCount>, CoreError> {
    read_deal_rows(reader).map_err(CoreError::Validation)
}

/// Read one year's deal-count file.
pub fn load_deal_counts(path: &Path) -> Result<Vec<DealCount>, CoreError> {
    let file = open(path)?;
    read_deal_rows(file).map_err(|reason| malformed(path, reason))
}

fn parse_year_headers(headers: &StringRecord) -> Result<Vec<i32>, String> {
    if headers.len() < 2 {
        return Err("expected a district column followed by year columns".into());
    }
    headers
        .iter()
        .skip(1)
        .map(|h| {
            h.parse::<i32>()
                .map_err(|_| format!("column header '{h}' is not a year"))
        })
        .collect()
}

fn read_total_cost<R: Read>(reader: R) -> Result<Vec<CostEntry>, String> {
    let mut rdr = csv_reader(reader);
    let years = parse_year_headers(rdr.headers().map_err(|e| e.to_string())?)?;

    let mut entries = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        let line = idx + 2;
        let district = record.get(0).unwrap_or_default();
        if district.is_empty() {
            return Err(format!("line {line}: missing district"));
        }
        for (year, cell) in years.iter().zip(record.iter().skip(1)) {
            if cell.is_empty() {
                continue;
            }
            let cost = cell
                .parse::<f64>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| format!("line {line}: invalid cost '{cell}' for {year}"))?;
            entries.push(CostEntry {
                district: district.to_string(),
                year: *year,
                cost,
            });
        }
    }
    Ok(entries)
}

/// Read and melt the wide total-cost table.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_total_cost_data(path: &Path) -> Result<Option<Vec<CostEntry>>, CoreError> {
    let file = match open(path) {
        Ok(file) => file,
        Err(CoreError::MissingDataFile(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    read_total_cost(file)
        .map(Some)
        .map_err(|reason| malformed(path, reason))
}

// ---------------------------------------------------------------------------
// Cached datasets
// ---------------------------------------------------------------------------

/// Everything the charts need, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsData {
    deals: BTreeMap<i32, Vec<DealCount>>,
    total_cost: Option<Vec<CostEntry>>,
    warnings: Vec<DataWarning>,
}

impl AnalyticsData {
    /// Load `deals_<year>.csv` for each year from `data_dir` and the
    /// total-cost table from `total_cost_file`.
    pub fn load(data_dir: &Path, years: &[i32], total_cost_file: &Path) -> Self {
        let mut data = Self::default();

        for &year in years {
            let path = data_dir.join(deal_file_name(year));
            match load_deal_counts(&path) {
                Ok(rows) => {
                    data.deals.insert(year, rows);
                }
                Err(err) => data.warn(&path, &err),
            }
        }

        match load_total_cost_data(total_cost_file) {
            Ok(Some(entries)) => data.total_cost = Some(entries),
            Ok(None) => {
                let err = CoreError::MissingDataFile(PathBuf::from(total_cost_file));
                data.warn(total_cost_file, &err);
            }
            Err(err) => data.warn(total_cost_file, &err),
        }

        tracing::info!(
            deal_years = data.deals.len(),
            total_cost_rows = data.total_cost.as_ref().map_or(0, Vec::len),
            warnings = data.warnings.len(),
            "Loaded analytics datasets"
        );
        data
    }

    /// Build from already parsed parts.
    pub fn from_parts(
        deals: BTreeMap<i32, Vec<DealCount>>,
        total_cost: Option<Vec<CostEntry>>,
    ) -> Self {
        Self {
            deals,
            total_cost,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, path: &Path, err: &CoreError) {
        tracing::warn!(file = %path.display(), error = %err, "Skipping analytics dataset");
        self.warnings.push(DataWarning::from_error(path, err));
    }

    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Years with a usable deal-count file, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.deals.keys().copied().collect()
    }

    /// Deal counts for `year`, busiest district first, optionally truncated.
    pub fn deals_for(&self, year: i32, limit: Option<usize>) -> Option<Vec<DealCount>> {
        let mut rows = self.deals.get(&year)?.clone();
        rows.sort_by(|a, b| b.deals.cmp(&a.deals).then_with(|| a.district.cmp(&b.district)));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Some(rows)
    }

    /// Total deals per year, ascending by year.
    pub fn yearly_deal_totals(&self) -> Vec<YearDeals> {
        self.deals
            .iter()
            .map(|(&year, rows)| YearDeals {
                year,
                deals: sum_deals(rows),
            })
            .collect()
    }

    /// Melted total-cost entries, optionally for one district.
    ///
    /// `None` when the total-cost file was unavailable.
    pub fn total_cost(&self, district: Option<&str>) -> Option<Vec<CostEntry>> {
        let entries = self.total_cost.as_ref()?;
        Some(
            entries
                .iter()
                .filter(|e| district.map_or(true, |d| e.district == d))
                .cloned()
                .collect(),
        )
    }

    /// Sum of all districts' costs per year, ascending by year.
    pub fn yearly_cost_totals(&self) -> Option<Vec<YearCost>> {
        let entries = self.total_cost.as_ref()?;
        let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
        for entry in entries {
            *totals.entry(entry.year).or_default() += entry.cost;
        }
        Some(
            totals
                .into_iter()
                .map(|(year, cost)| YearCost { year, cost })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_deals_by_position_and_sums_duplicates() {
        let csv = "الحي,عدد الصفقات\nحي الملقا,12\nحي النرجس,7.0\nحي الملقا,3\n";
        let rows = parse_deal_counts(csv.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                DealCount {
                    district: "حي الملقا".into(),
                    deals: 15
                },
                DealCount {
                    district: "حي النرجس".into(),
                    deals: 7
                },
            ]
        );
    }

    #[test]
    fn rejects_non_numeric_deal_count() {
        let err = parse_deal_counts("d,n\nحي الملقا,many\n".as_bytes()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("line 2"));
    }

    #[test]
    fn duplicate_district_overflowing_u64_is_rejected() {
        let csv = format!("d,n\nحي الملقا,{max}\nحي الملقا,1\n", max = u64::MAX);
        let err = parse_deal_counts(csv.as_bytes()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("line 3") && msg.contains("overflows"));
    }

    #[test]
    fn overflowing_deal_file_becomes_a_load_warning() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            &deal_file_name(2022),
            &format!("d,n\nحي الملقا,{max}\nحي الملقا,{max}\n", max = u64::MAX),
        );

        let data = AnalyticsData::load(dir.path(), &[2022], &dir.path().join(TOTAL_COST_FILE));
        assert!(data.years().is_empty());
        assert!(data.warnings()[0].message.contains("overflows"));
    }

    #[test]
    fn yearly_totals_saturate_instead_of_wrapping() {
        let deals = BTreeMap::from([(
            2022,
            vec![
                DealCount {
                    district: "a".into(),
                    deals: u64::MAX,
                },
                DealCount {
                    district: "b".into(),
                    deals: 1,
                },
            ],
        )]);
        let data = AnalyticsData::from_parts(deals, None);

        assert_eq!(data.yearly_deal_totals(), vec![YearDeals { year: 2022, deals: u64::MAX }]);
    }

    #[test]
    fn rejects_row_without_count_column() {
        assert!(parse_deal_counts("d,n\nحي الملقا\n".as_bytes()).is_err());
    }

    #[test]
    fn missing_deal_file_is_reported_as_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_deal_counts(&dir.path().join("deals_2030.csv")).unwrap_err();
        assert_matches!(err, CoreError::MissingDataFile(_));
    }

    #[test]
    fn melts_wide_total_cost_table() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            TOTAL_COST_FILE,
            "district,2021,2022\nحي الملقا,1000.5,2000\nحي النرجس,,300\n",
        );

        let entries = load_total_cost_data(&path).unwrap().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            CostEntry {
                district: "حي الملقا".into(),
                year: 2021,
                cost: 1000.5
            }
        );
        assert_eq!(entries[2].year, 2022);
        assert_eq!(entries[2].district, "حي النرجس");
    }

    #[test]
    fn absent_total_cost_file_is_no_data() {
        let dir = TempDir::new().unwrap();
        let result = load_total_cost_data(&dir.path().join(TOTAL_COST_FILE)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn non_year_header_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, TOTAL_COST_FILE, "district,total\nحي الملقا,5\n");
        assert_matches!(
            load_total_cost_data(&path),
            Err(CoreError::MalformedDataFile { reason, .. }) if reason.contains("total")
        );
    }

    #[test]
    fn load_collects_warnings_and_keeps_good_years() {
        let dir = TempDir::new().unwrap();
        write(&dir, &deal_file_name(2021), "d,n\nحي الملقا,4\nحي العليا,9\n");
        write(&dir, &deal_file_name(2022), "d,n\nحي الملقا,oops\n");

        let data = AnalyticsData::load(dir.path(), &[2021, 2022, 2023], &dir.path().join(TOTAL_COST_FILE));

        assert_eq!(data.years(), vec![2021]);
        // 2022 malformed, 2023 missing, total cost missing.
        assert_eq!(data.warnings().len(), 3);
        assert!(data.total_cost(None).is_none());
        assert!(data.yearly_cost_totals().is_none());
    }

    #[test]
    fn deals_for_sorts_busiest_first_and_limits() {
        let deals = BTreeMap::from([(
            2022,
            vec![
                DealCount {
                    district: "a".into(),
                    deals: 1,
                },
                DealCount {
                    district: "b".into(),
                    deals: 5,
                },
                DealCount {
                    district: "c".into(),
                    deals: 3,
                },
            ],
        )]);
        let data = AnalyticsData::from_parts(deals, None);

        let top = data.deals_for(2022, Some(2)).unwrap();
        assert_eq!(top.iter().map(|r| r.district.as_str()).collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(data.deals_for(2019, None).is_none());
        assert_eq!(data.yearly_deal_totals(), vec![YearDeals { year: 2022, deals: 9 }]);
    }

    #[test]
    fn total_cost_filters_and_sums_per_year() {
        let entries = vec![
            CostEntry {
                district: "a".into(),
                year: 2021,
                cost: 10.0,
            },
            CostEntry {
                district: "b".into(),
                year: 2021,
                cost: 5.0,
            },
            CostEntry {
                district: "a".into(),
                year: 2022,
                cost: 1.0,
            },
        ];
        let data = AnalyticsData::from_parts(BTreeMap::new(), Some(entries));

        assert_eq!(data.total_cost(Some("a")).unwrap().len(), 2);
        assert_eq!(data.total_cost(Some("zzz")).unwrap().len(), 0);
        assert_eq!(
            data.yearly_cost_totals().unwrap(),
            vec![
                YearCost {
                    year: 2021,
                    cost: 15.0
                },
                YearCost {
                    year: 2022,
                    cost: 1.0
                },
            ]
        );
    }

    #[test]
    fn bundled_datasets_load_cleanly() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let data = AnalyticsData::load(&data_dir, &[2022, 2023], &data_dir.join(TOTAL_COST_FILE));
        assert!(data.warnings().is_empty(), "{:?}", data.warnings());
        assert_eq!(data.years(), vec![2022, 2023]);
    }
}
