/// Course and instructor metadata a trace file name is derived from.
#[derive(Debug, Clone, Copy)]
pub struct TraceNameParts<'a> {
    pub course_name: &'a str,
    pub instructor_name: &'a str,
    pub subject_code: &'a str,
    pub course_number: i32,
    pub semester_term: &'a str,
    pub semester_year: i32,
}

/// Replace every run of non-ASCII-alphanumeric characters with a single `_`,
/// then strip leading and trailing underscores.
pub fn sanitize_segment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    out.trim_matches('_').to_string()
}

/// `{course}_{instructor}_{subject}_{number}_{term}_{year}.pdf`
///
/// Only the course and instructor names are sanitized. The result depends on the
/// metadata alone, so two uploads for the same course share an object key.
pub fn derive_trace_filename(parts: &TraceNameParts<'_>) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}.pdf",
        sanitize_segment(parts.course_name),
        sanitize_segment(parts.instructor_name),
        parts.subject_code,
        parts.course_number,
        parts.semester_term,
        parts.semester_year,
    )
}
