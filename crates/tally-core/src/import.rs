//! Expense file loading
//!
//! Two formats are accepted:
//! - JSON: an array of expense records
//! - CSV: header `id,amount,category,description,date` (the `id` column may be
//!   blank or absent; rows then get `row-<n>`)

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

/// Load expenses from a `.json` or `.csv` file
///
/// Unknown extensions are read as JSON.
pub fn load_expenses(path: &Path) -> Result<Vec<ExpenseRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let expenses = if is_csv {
        parse_csv(reader)?
    } else {
        parse_json(reader)?
    };

    debug!("Loaded {} expenses from {}", expenses.len(), path.display());
    Ok(expenses)
}

/// Parse a JSON array of expense records
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    amount: String,
    category: String,
    #[serde(default)]
    description: String,
    date: String,
}

/// Parse expense CSV with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut expenses = Vec::new();
    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let number = index + 1;

        let amount = parse_amount(&row.amount)
            .map_err(|_| Error::InvalidData(format!("row {}: invalid amount {:?}", number, row.amount)))?;

        let id = row
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("row-{}", number));

        expenses.push(ExpenseRecord {
            id,
            amount,
            category: row.category,
            description: row.description,
            date: row.date,
        });
    }

    Ok(expenses)
}

/// Parse an amount, tolerating currency symbols and thousands separators
fn parse_amount(s: &str) -> std::result::Result<f64, std::num::ParseFloatError> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");
    cleaned.parse::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-12.5").unwrap(), -12.5);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.0);
        assert!(parse_amount("lots").is_err());
    }

    #[test]
    fn test_parse_csv() {
        let csv = "id,amount,category,description,date
e1,50.00,Food,Groceries,2024-05-01
,20,Food,Lunch,2024-05-02
e3, 10.00 ,Transportation,Bus pass,2024-05-03";

        let expenses = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].id, "e1");
        assert_eq!(expenses[0].amount, 50.0);
        assert_eq!(expenses[1].id, "row-2");
        assert_eq!(expenses[1].description, "Lunch");
        assert_eq!(expenses[2].amount, 10.0);
        assert_eq!(expenses[2].date, "2024-05-03");
    }

    #[test]
    fn test_parse_csv_without_id_column() {
        let csv = "amount,category,description,date\n4.5,Food,Coffee,2024-01-01\n";
        let expenses = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(expenses[0].id, "row-1");
        assert_eq!(expenses[0].category, "Food");
    }

    #[test]
    fn test_parse_csv_bad_amount() {
        let csv = "id,amount,category,description,date\na,ten,Food,Lunch,2024-01-01\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[{"id":"x","amount":9.99,"category":"Dog","description":"Treats","date":"2024-02-02"}]"#;
        let expenses = parse_json(json.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Dog");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("expenses.CSV");
        let mut file = File::create(&csv_path).unwrap();
        writeln!(file, "id,amount,category,description,date").unwrap();
        writeln!(file, "a,1,Bills,Power,2024-01-01").unwrap();
        assert_eq!(load_expenses(&csv_path).unwrap()[0].id, "a");

        let other_path = dir.path().join("expenses.txt");
        std::fs::write(&other_path, "[]").unwrap();
        assert!(load_expenses(&other_path).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_expenses(Path::new("/nonexistent/expenses.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
