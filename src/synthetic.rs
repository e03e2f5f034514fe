use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::memory_provider::MemoryProvider;
use crate::screens::{ColumnKind, ColumnSpec, Screen, TableSpec};
use crate::traits::Row;

const DEFAULT_ROWS_PER_TABLE: usize = 2_000;
const DEFAULT_SEED: u64 = 42;
/// Probability that a nullable column is left empty.
const NULL_RATE: f64 = 0.08;
/// Days since 1970-01-01 of 2022-01-01.
const BASE_DAY: i64 = 18_993;
const DAY_SPAN: i64 = 3 * 365;

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Diya", "Ishaan", "Kavya", "Rohan", "Meera", "Arjun", "Ananya", "Vikram", "Priya",
    "Kabir", "Sneha", "Nikhil", "Pooja", "Rahul", "Tara",
];
const LAST_NAMES: &[&str] = &[
    "Sharma", "Iyer", "Patel", "Reddy", "Nair", "Gupta", "Menon", "Singh", "Rao", "Joshi", "Das",
    "Kulkarni",
];
const COMPANY_STEMS: &[&str] = &[
    "Apex", "Bluefin", "Cedar", "Delta", "Everest", "Falcon", "Granite", "Horizon", "Indus",
    "Juniper", "Kestrel", "Lotus",
];
const COMPANY_SUFFIXES: &[&str] = &["Technologies", "Traders", "Logistics", "Labs", "Exports", "Infra"];
const WORDS: &[&str] = &[
    "follow", "up", "with", "client", "on", "revised", "scope", "pending", "approval", "from",
    "finance", "shared", "proposal", "call", "scheduled", "next", "week", "requested", "discount",
    "for", "annual", "renewal", "documents", "received", "awaiting", "signature",
];

/// Deterministic generator for console datasets.
///
/// Each table is generated from its own RNG stream derived from the seed and
/// the table name, so tables do not shift when another table changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticDataset {
    seed: u64,
    rows_per_table: usize,
}

impl Default for SyntheticDataset {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, DEFAULT_ROWS_PER_TABLE)
    }
}

impl SyntheticDataset {
    pub fn new(seed: u64, rows_per_table: usize) -> Self {
        Self { seed, rows_per_table }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rows_per_table(&self) -> usize {
        self.rows_per_table
    }

    /// Generates the rows of one table, in id order.
    pub fn generate_table(&self, spec: &TableSpec) -> Vec<Row> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ table_salt(spec.table));
        (1..=self.rows_per_table as i64)
            .map(|id| generate_row(&mut rng, spec, id))
            .collect()
    }

    /// Generates every screen table into an in-memory provider.
    pub fn build(&self) -> MemoryProvider {
        let mut provider = MemoryProvider::new(format!("synthetic (seed {})", self.seed));
        for screen in Screen::ALL {
            let spec = screen.table_spec();
            provider.insert_table(spec.table, self.generate_table(spec));
        }
        log::info!("generated {} synthetic rows", provider.total_rows());
        provider
    }
}

/// FNV-1a over the table name.
fn table_salt(table: &str) -> u64 {
    table
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

fn generate_row(rng: &mut StdRng, spec: &TableSpec, id: i64) -> Row {
    let mut row = Row::new();
    for column in spec.columns {
        let value = if column.nullable && rng.gen_bool(NULL_RATE) {
            Value::Null
        } else {
            generate_value(rng, column, id)
        };
        row.insert(column.key.to_string(), value);
    }
    row
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

fn generate_value(rng: &mut StdRng, column: &ColumnSpec, id: i64) -> Value {
    match column.kind {
        ColumnKind::Id => Value::from(id),
        ColumnKind::Name => Value::from(format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))),
        ColumnKind::Company => Value::from(format!(
            "{} {}",
            pick(rng, COMPANY_STEMS),
            pick(rng, COMPANY_SUFFIXES)
        )),
        ColumnKind::Email => Value::from(format!(
            "{}.{}{}@example.in",
            pick(rng, FIRST_NAMES).to_lowercase(),
            pick(rng, LAST_NAMES).to_lowercase(),
            rng.gen_range(1..100)
        )),
        ColumnKind::Code(prefix) => Value::from(format!("{}-{:05}", prefix, id)),
        // Paise, up to ten lakh rupees
        ColumnKind::Money => Value::from(rng.gen_range(100_00..10_00_000_00_i64)),
        ColumnKind::Count { min, max } => Value::from(rng.gen_range(min..=max)),
        ColumnKind::Date => Value::from(format_date(BASE_DAY + rng.gen_range(0..DAY_SPAN))),
        ColumnKind::Timestamp => Value::from(format!(
            "{}T{:02}:{:02}:{:02}Z",
            format_date(BASE_DAY + rng.gen_range(0..DAY_SPAN)),
            rng.gen_range(0..24),
            rng.gen_range(0..60),
            rng.gen_range(0..60)
        )),
        ColumnKind::Status(labels) => Value::from(pick(rng, labels)),
        ColumnKind::Notes => {
            let len = rng.gen_range(3..40);
            let words: Vec<&str> = (0..len).map(|_| pick(rng, WORDS)).collect();
            Value::from(words.join(" "))
        }
    }
}

/// Formats days since the Unix epoch as `YYYY-MM-DD` (proleptic Gregorian).
pub fn format_date(days: i64) -> String {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::{FinanceTab, SalesTab};
    use crate::traits::RowProvider;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "1970-01-01");
        assert_eq!(format_date(BASE_DAY), "2022-01-01");
        assert_eq!(format_date(19_417), "2023-03-01");
        assert_eq!(format_date(19_782), "2024-02-29");
    }

    #[test]
    fn test_deterministic_for_seed() {
        let spec = Screen::Finance(FinanceTab::Invoices).table_spec();
        let a = SyntheticDataset::new(7, 50).generate_table(spec);
        let b = SyntheticDataset::new(7, 50).generate_table(spec);
        let c = SyntheticDataset::new(8, 50).generate_table(spec);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rows_follow_column_spec() {
        let spec = Screen::Sales(SalesTab::Leads).table_spec();
        let rows = SyntheticDataset::new(1, 200).generate_table(spec);
        assert_eq!(rows.len(), 200);
        for (i, row) in rows.iter().enumerate() {
            let keys: Vec<&str> = row.keys().map(String::as_str).collect();
            let expected: Vec<&str> = spec.columns.iter().map(|c| c.key).collect();
            assert_eq!(keys, expected);
            assert_eq!(row["id"].as_i64(), Some(i as i64 + 1));
            assert!(row["created_at"].is_string());
        }
        // Nullable columns produce some nulls over 200 rows
        assert!(rows.iter().any(|r| r["notes"].is_null()));
    }

    #[test]
    fn test_build_covers_every_screen() {
        let provider = SyntheticDataset::new(3, 10).build();
        assert_eq!(provider.total_rows(), 10 * Screen::ALL.len());
        let q = Screen::Finance(FinanceTab::Payments).table_spec().query(5);
        assert_eq!(provider.fetch_rows(&q, None).unwrap().len(), 6);
    }
}
