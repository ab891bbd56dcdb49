//! Bulk import of performance records from comma-separated text.
//!
//! Expected columns: `year,name,agg,achievements...`. A first line containing
//! "year" (any case) is a header. Achievements may contain commas; trailing
//! fields are rejoined with ", ".

use serde::Serialize;

use crate::models::{generate_id, now_millis, placeholder_photo, StudentPerformance, DEFAULT_GRADE};

/// Format hint shown when nothing could be imported.
pub const FORMAT_HINT: &str =
    "No valid records found in file. Please ensure format is: Year, Name, AGG, Achievements";

/// A line the importer skipped.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLine {
    /// 1-based line number in the input
    pub line: usize,
    pub reason: String,
}

/// Result of parsing an import blob.
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub records: Vec<StudentPerformance>,
    pub rejected: Vec<RejectedLine>,
}

impl CsvImport {
    pub fn accepted(&self) -> usize {
        self.records.len()
    }
}

/// Parse an import blob into performance records.
pub fn parse_performance_csv(text: &str) -> CsvImport {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = match lines.first() {
        Some(first) if first.to_lowercase().contains("year") => 1,
        _ => 0,
    };

    let base_seed = now_millis();
    let mut import = CsvImport::default();

    for (index, raw) in lines.iter().enumerate().skip(start) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok((year, name, agg, achievements)) => {
                import.records.push(StudentPerformance {
                    id: generate_id(),
                    year,
                    student_name: name,
                    grade: DEFAULT_GRADE.to_string(),
                    agg,
                    achievements,
                    photo_url: Some(placeholder_photo(base_seed + index as i64)),
                });
            }
            Err(reason) => {
                tracing::debug!(line = index + 1, "Skipping CSV line: {}", reason);
                import.rejected.push(RejectedLine {
                    line: index + 1,
                    reason: reason.to_string(),
                });
            }
        }
    }

    import
}

fn parse_line(line: &str) -> Result<(i32, String, f64, String), &'static str> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return Err("expected at least 3 fields");
    }

    let year = parse_leading_int(parts[0]).ok_or("year is not a number")?;
    let name = parts[1];
    if name.is_empty() {
        return Err("name is empty");
    }
    let agg = parse_leading_float(parts[2]).ok_or("aggregate is not a number")?;
    // JSON has no representation for infinity
    if !agg.is_finite() {
        return Err("aggregate is out of range");
    }
    let achievements = parts[3..].join(", ");

    Ok((year, name.to_string(), agg, achievements))
}

/// Parse an optional sign followed by leading digits, ignoring any trailing text.
///
/// Digit runs beyond `i32` saturate at the bound matching their sign.
fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let negative = s.starts_with('-');
    let digits_start = usize::from(s.starts_with(['+', '-']));
    let digits = s[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    match s[..digits_start + digits].parse() {
        Ok(value) => Some(value),
        Err(_) if negative => Some(i32::MIN),
        Err(_) => Some(i32::MAX),
    }
}

/// Parse the longest leading decimal number, ignoring any trailing text.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(s.starts_with(['+', '-']));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }

    // Optional exponent, only taken when complete
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_skipped_and_bad_rows_dropped() {
        let import = parse_performance_csv(
            "Year,Name,AGG,Achievements\n2020,Jane Doe,5,Valedictorian\nbad,,x\n2021,John Roe,7",
        );

        assert_eq!(import.accepted(), 2);
        assert_eq!(import.records[0].year, 2020);
        assert_eq!(import.records[0].student_name, "Jane Doe");
        assert_eq!(import.records[0].agg, 5.0);
        assert_eq!(import.records[0].achievements, "Valedictorian");
        assert_eq!(import.records[1].year, 2021);
        assert_eq!(import.records[1].achievements, "");

        assert_eq!(import.rejected.len(), 1);
        assert_eq!(import.rejected[0].line, 3);
    }

    #[test]
    fn test_no_header_keeps_first_line() {
        let import = parse_performance_csv("2019,Ama Mensah,6,Best in Science");
        assert_eq!(import.accepted(), 1);
        assert_eq!(import.records[0].grade, DEFAULT_GRADE);
    }

    #[test]
    fn test_header_detection_is_case_insensitive() {
        let import = parse_performance_csv("YEAR,NAME,AGG\n2018,Kojo,9");
        assert_eq!(import.accepted(), 1);
        assert!(import.rejected.is_empty());
    }

    #[test]
    fn test_achievements_rejoined() {
        let import =
            parse_performance_csv("2022, Esi Boateng , 4.5 , Head Girl,Math Olympiad , Choir");
        let record = &import.records[0];
        assert_eq!(record.student_name, "Esi Boateng");
        assert_eq!(record.agg, 4.5);
        assert_eq!(record.achievements, "Head Girl, Math Olympiad, Choir");
    }

    #[test]
    fn test_leading_numeric_prefixes() {
        let import = parse_performance_csv("2021abc,Yaw Asante,7pts\r\n");
        assert_eq!(import.accepted(), 1);
        assert_eq!(import.records[0].year, 2021);
        assert_eq!(import.records[0].agg, 7.0);
    }

    #[test]
    fn test_blank_lines_and_short_rows() {
        let import = parse_performance_csv("\n   \n2020,Only Two\n2020,,6\n2020,Name,n/a\n");
        assert_eq!(import.accepted(), 0);
        let lines: Vec<usize> = import.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let import = parse_performance_csv("2020,A,1\n2020,B,2\n2020,C,3");
        let mut ids: Vec<&str> = import.records.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("8"), Some(8.0));
        assert_eq!(parse_leading_float("-2.5x"), Some(-2.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("x1"), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("2020"), Some(2020));
        assert_eq!(parse_leading_int("2020.9"), Some(2020));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("bad"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999"), Some(i32::MAX));
        assert_eq!(parse_leading_int("-99999999999"), Some(i32::MIN));
    }

    #[test]
    fn test_oversized_numbers() {
        let import = parse_performance_csv("99999999999,Big Year,6
2020,Huge Agg,1e999
2020,Words,Infinity");
        assert_eq!(import.accepted(), 1);
        assert_eq!(import.records[0].year, i32::MAX);
        let reasons: Vec<(usize, &str)> = import
            .rejected
            .iter()
            .map(|r| (r.line, r.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![(2, "aggregate is out of range"), (3, "aggregate is not a number")]
        );
    }
}
