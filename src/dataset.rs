//! Offline datasets in JSON Lines format.
//!
//! ```text
//! {"type":"header","version":"1.0","metadata":{...}}
//! {"type":"row","table":"invoices","row":{...}}
//! ...
//! {"type":"footer","total_rows":N}
//! ```
//!
//! Files ending in `.br` are Brotli-compressed on write and decompressed
//! transparently on read.

use anyhow::{anyhow, Context, Result};
use brotli::enc::BrotliEncoderParams;
use brotli::{CompressorWriter, Decompressor};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::memory_provider::MemoryProvider;
use crate::synthetic::SyntheticDataset;
use crate::traits::Row;

pub const DATASET_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum DatasetLine {
    #[serde(rename = "header")]
    Header {
        version: String,
        #[serde(default)]
        metadata: serde_json::Value,
    },
    #[serde(rename = "row")]
    Row { table: String, row: Row },
    #[serde(rename = "footer")]
    Footer { total_rows: usize },
}

fn is_brotli(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "br")
}

pub struct DatasetWriter {
    writer: Box<dyn Write>,
    row_count: usize,
}

impl DatasetWriter {
    /// Creates a dataset file at `path`.
    ///
    /// Brotli compression is enabled when the path ends with `.br`
    /// (e.g. `crm.jsonl.br`), using quality 6.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;

        let writer: Box<dyn Write> = if is_brotli(path) {
            let params = BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(BufWriter::new(file), 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(Self { writer, row_count: 0 })
    }

    pub fn write_header(&mut self, metadata: serde_json::Value) -> Result<()> {
        self.write_line(&DatasetLine::Header {
            version: DATASET_VERSION.to_string(),
            metadata,
        })
    }

    pub fn write_row(&mut self, table: &str, row: &Row) -> Result<()> {
        // Borrowing variant of DatasetLine::Row
        #[derive(Serialize)]
        struct RowLine<'a> {
            #[serde(rename = "type")]
            line_type: &'static str,
            table: &'a str,
            row: &'a Row,
        }

        self.write_line(&RowLine { line_type: "row", table, row })?;
        self.row_count += 1;
        Ok(())
    }

    /// Writes the footer and flushes. The writer should not be used afterwards.
    pub fn write_footer(&mut self) -> Result<()> {
        self.write_line(&DatasetLine::Footer { total_rows: self.row_count })?;
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).context("Failed to serialize to JSON")?;
        writeln!(self.writer, "{}", json).context("Failed to write line")?;
        Ok(())
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Writes a complete synthetic dataset to `path`. Returns the row count.
pub fn write_synthetic(path: impl AsRef<Path>, dataset: &SyntheticDataset) -> Result<usize> {
    let mut writer = DatasetWriter::new(path)?;
    writer.write_header(serde_json::json!({
        "name": format!("synthetic-{}", dataset.seed()),
        "seed": dataset.seed(),
        "rows_per_table": dataset.rows_per_table(),
    }))?;
    for screen in crate::screens::Screen::ALL {
        let spec = screen.table_spec();
        for row in dataset.generate_table(spec) {
            writer.write_row(spec.table, &row)?;
        }
    }
    writer.write_footer()?;
    Ok(writer.row_count())
}

/// Loads a dataset file into an in-memory provider.
///
/// The header must be the first line. When a footer is present its row
/// count must match the rows read, which catches truncated files.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<MemoryProvider> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let reader: Box<dyn BufRead> = if is_brotli(path) {
        Box::new(BufReader::new(Decompressor::new(file, 4096)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut provider: Option<MemoryProvider> = None;
    let mut rows_read = 0usize;
    let mut footer_rows: Option<usize> = None;
    let mut seen_content = false;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed: DatasetLine = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON at line {}", line_num + 1))?;

        let first = !seen_content;
        seen_content = true;

        match parsed {
            DatasetLine::Header { version, metadata } => {
                if !first {
                    return Err(anyhow!("Header must be first line (found at line {})", line_num + 1));
                }
                if version.split('.').next() != DATASET_VERSION.split('.').next() {
                    return Err(anyhow!("Unsupported dataset version {}", version));
                }
                let label = metadata
                    .get("name")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| path.display().to_string());
                provider = Some(MemoryProvider::new(label));
            }
            DatasetLine::Row { table, row } => {
                let provider = provider
                    .as_mut()
                    .ok_or_else(|| anyhow!("Row before header at line {}", line_num + 1))?;
                if footer_rows.is_some() {
                    return Err(anyhow!("Row after footer at line {}", line_num + 1));
                }
                provider.push_row(&table, row);
                rows_read += 1;
            }
            DatasetLine::Footer { total_rows } => {
                footer_rows = Some(total_rows);
            }
        }
    }

    let provider = provider.ok_or_else(|| anyhow!("Missing header line"))?;
    if let Some(expected) = footer_rows {
        if expected != rows_read {
            return Err(anyhow!(
                "Footer declares {} rows but {} were read",
                expected,
                rows_read
            ));
        }
    }

    log::info!(
        "loaded dataset {} ({} rows in {} tables)",
        path.display(),
        rows_read,
        provider.table_names().count()
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("opsdesk_dataset_{}_{}", std::process::id(), name))
    }

    fn row(id: i64) -> Row {
        json!({"id": id, "client": "Acme"}).as_object().cloned().unwrap()
    }

    #[test]
    fn test_write_and_read_plain() {
        let path = temp_path("plain.jsonl");
        {
            let mut w = DatasetWriter::new(&path).unwrap();
            w.write_header(json!({"name": "fixture"})).unwrap();
            w.write_row("invoices", &row(1)).unwrap();
            w.write_row("invoices", &row(2)).unwrap();
            w.write_row("payments", &row(1)).unwrap();
            w.write_footer().unwrap();
        }
        let provider = read_dataset(&path).unwrap();
        assert_eq!(provider.label(), "fixture");
        assert_eq!(provider.row_count("invoices"), Some(2));
        assert_eq!(provider.row_count("payments"), Some(1));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_header_must_be_first() {
        let path = temp_path("late_header.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"row\",\"table\":\"t\",\"row\":{\"id\":1}}\n{\"type\":\"header\",\"version\":\"1.0\"}\n",
        )
        .unwrap();
        assert!(read_dataset(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_blank_lines_before_header_are_skipped() {
        let path = temp_path("leading_blank.jsonl");
        std::fs::write(
            &path,
            "\n  \n{\"type\":\"header\",\"version\":\"1.0\",\"metadata\":{\"name\":\"padded\"}}\n\n{\"type\":\"row\",\"table\":\"t\",\"row\":{\"id\":1}}\n",
        )
        .unwrap();
        let provider = read_dataset(&path).unwrap();
        assert_eq!(provider.label(), "padded");
        assert_eq!(provider.row_count("t"), Some(1));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_second_header_rejected() {
        let path = temp_path("two_headers.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"header\",\"version\":\"1.0\"}\n\n{\"type\":\"header\",\"version\":\"1.0\"}\n",
        )
        .unwrap();
        assert!(read_dataset(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_footer_count_mismatch() {
        let path = temp_path("truncated.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"header\",\"version\":\"1.0\"}\n{\"type\":\"row\",\"table\":\"t\",\"row\":{\"id\":1}}\n{\"type\":\"footer\",\"total_rows\":2}\n",
        )
        .unwrap();
        let err = read_dataset(&path).unwrap_err();
        assert!(err.to_string().contains("Footer declares 2 rows"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_line_type_rejected() {
        let path = temp_path("unknown.jsonl");
        std::fs::write(
            &path,
            "{\"type\":\"header\",\"version\":\"1.0\"}\n{\"type\":\"blob\"}\n",
        )
        .unwrap();
        assert!(read_dataset(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_version() {
        let path = temp_path("v2.jsonl");
        std::fs::write(&path, "{\"type\":\"header\",\"version\":\"2.0\"}\n").unwrap();
        assert!(read_dataset(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
