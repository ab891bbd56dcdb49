//! Alumni identity check used to gate testimonial submission.

use crate::errors::AppError;
use crate::models::StudentPerformance;

/// Find the first record matching a claimed name and class label.
///
/// The name must equal the record's student name ignoring case and
/// surrounding whitespace. The class label is used as typed and must
/// contain the record's year, so "Class of 2023" and "2023" both match 2023.
pub fn find_alumni_match<'a>(
    name: &str,
    class_label: &str,
    records: &'a [StudentPerformance],
) -> Option<&'a StudentPerformance> {
    let claimed = name.trim().to_lowercase();
    records.iter().find(|record| {
        record.student_name.to_lowercase() == claimed
            && class_label.contains(&record.year.to_string())
    })
}

/// Verify an alumni claim, failing with one generic error for any mismatch.
pub fn identify_alumnus<'a>(
    name: &str,
    class_label: &str,
    records: &'a [StudentPerformance],
) -> Result<&'a StudentPerformance, AppError> {
    if name.is_empty() || class_label.is_empty() {
        return Err(AppError::Validation(
            "Please fill in all fields.".to_string(),
        ));
    }

    find_alumni_match(name, class_label, records).ok_or(AppError::AlumniNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initial_performance;

    fn record(year: i32, name: &str) -> StudentPerformance {
        StudentPerformance {
            id: format!("{}-{}", name, year),
            year,
            student_name: name.to_string(),
            grade: "12th Grade".to_string(),
            agg: 8.0,
            achievements: String::new(),
            photo_url: None,
        }
    }

    #[test]
    fn test_matches_name_case_and_whitespace_insensitively() {
        let records = vec![record(2023, "Sarah Jenkins")];
        for claim in ["Sarah Jenkins", "  sarah jenkins ", "SARAH JENKINS"] {
            assert!(find_alumni_match(claim, "Class of 2023", &records).is_some());
        }
    }

    #[test]
    fn test_year_must_appear_in_class_label() {
        let records = vec![record(2022, "Sarah Jenkins")];
        assert!(find_alumni_match("Sarah Jenkins", "Class of 2023", &records).is_none());
        assert!(find_alumni_match("Sarah Jenkins", "2022", &records).is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let records = vec![record(2020, "Kofi Mensah"), record(2021, "Kofi Mensah")];
        let found = find_alumni_match("kofi mensah", "2020 and 2021", &records).unwrap();
        assert_eq!(found.year, 2020);
    }

    #[test]
    fn test_errors_are_generic() {
        let records = initial_performance();

        let wrong_name = identify_alumnus("Nobody", "Class of 2023", &records).unwrap_err();
        let wrong_year = identify_alumnus("Sarah Jenkins", "Class of 1999", &records).unwrap_err();
        assert_eq!(wrong_name.message(), wrong_year.message());
        assert!(matches!(wrong_name, AppError::AlumniNotFound));

        assert!(matches!(
            identify_alumnus("", "2023", &records),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            identify_alumnus("sarah jenkins", "Class of 2023", &records)
                .unwrap()
                .student_name,
            "Sarah Jenkins"
        );
    }
}
