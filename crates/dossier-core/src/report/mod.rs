//! Report artifacts and output naming.

pub mod document;
pub mod pdf;
pub mod tabular;

/// One downloadable artifact; the single output of a report invocation.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Lower-case the title and collapse every run of non-alphanumeric
/// characters into a single underscore.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Artifact file name for a report title.
pub fn report_file_name(title: &str, extension: &str) -> String {
    format!("{}_eval_report.{extension}", slug(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_non_alphanumeric_runs() {
        assert_eq!(slug("Q3 Safety Review"), "q3_safety_review");
        assert_eq!(slug("Eval!!  2024"), "eval_2024");
        assert_eq!(slug("Trailing!"), "trailing_");
    }

    #[test]
    fn file_names_carry_format_suffix() {
        assert_eq!(
            report_file_name("Q3 Safety Review", "pdf"),
            "q3_safety_review_eval_report.pdf"
        );
        assert_eq!(
            report_file_name("Q3 Safety Review", "csv"),
            "q3_safety_review_eval_report.csv"
        );
    }
}
