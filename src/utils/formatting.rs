//! Text formatting utilities for the console.
//!
//! Cell values arrive as raw JSON; these helpers turn them into display text
//! according to the column kind.

use opsdesk::ColumnKind;
use serde_json::Value;
use sysinfo::{Pid, ProcessRefreshKind, RefreshKind, System};

/// Placeholder for empty cells
pub const EMPTY_CELL: &str = "-";

/// Groups digits in threes: `1234567` becomes `1,234,567`.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats paise as rupees with Indian digit grouping.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_money(123456789), "₹12,34,567.89");
/// ```
pub fn format_money(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    let rupees = (abs / 100).to_string();
    let fraction = abs % 100;

    // Last three digits, then groups of two
    let grouped = if rupees.len() <= 3 {
        rupees
    } else {
        let (head, tail) = rupees.split_at(rupees.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            parts.push(&head[end - 2..end]);
            end -= 2;
        }
        parts.push(&head[..end]);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    format!("{}₹{}.{:02}", sign, grouped, fraction)
}

/// Display text for a cell.
pub fn format_cell(value: Option<&Value>, kind: ColumnKind) -> String {
    match (value, kind) {
        (None, _) | (Some(Value::Null), _) => EMPTY_CELL.to_string(),
        (Some(Value::Number(n)), ColumnKind::Money) => match n.as_i64() {
            Some(paise) => format_money(paise),
            None => n.to_string(),
        },
        (Some(Value::Number(n)), ColumnKind::Count { .. }) => match n.as_i64() {
            Some(i) => format_count(i),
            None => n.to_string(),
        },
        (Some(Value::String(s)), ColumnKind::Timestamp) => s.replacen('T', " ", 1).trim_end_matches('Z').to_string(),
        (Some(Value::String(s)), _) => s.clone(),
        (Some(other), _) => other.to_string(),
    }
}

/// Gets the current process memory usage in megabytes.
///
/// Returns 0.0 if the process information cannot be retrieved.
pub fn get_current_memory_mb() -> f64 {
    let mut sys = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::new().with_memory()),
    );
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());

    if let Some(process) = sys.process(Pid::from_u32(std::process::id())) {
        process.memory() as f64 / (1024.0 * 1024.0)
    } else {
        0.0
    }
}

pub fn format_memory_mb(memory_mb: f64) -> String {
    if memory_mb > 1024.0 {
        format!("Memory: {:.2} GB", memory_mb / 1024.0)
    } else {
        format!("Memory: {:.1} MB", memory_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(-1234567), "-1,234,567");
    }

    #[test]
    fn test_format_money_indian_grouping() {
        assert_eq!(format_money(5), "₹0.05");
        assert_eq!(format_money(99_900), "₹999.00");
        assert_eq!(format_money(123_456), "₹1,234.56");
        assert_eq!(format_money(123_456_789), "₹12,34,567.89");
        assert_eq!(format_money(-10_000_000_00), "-₹1,00,00,000.00");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(None, ColumnKind::Name), EMPTY_CELL);
        assert_eq!(format_cell(Some(&json!(null)), ColumnKind::Money), EMPTY_CELL);
        assert_eq!(format_cell(Some(&json!(250_000)), ColumnKind::Money), "₹2,500.00");
        assert_eq!(
            format_cell(Some(&json!("2024-03-01T09:30:00Z")), ColumnKind::Timestamp),
            "2024-03-01 09:30:00"
        );
        assert_eq!(format_cell(Some(&json!(7)), ColumnKind::Id), "7");
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory_mb(512.5), "Memory: 512.5 MB");
        assert_eq!(format_memory_mb(2048.0), "Memory: 2.00 GB");
    }
}
