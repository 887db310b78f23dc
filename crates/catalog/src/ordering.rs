use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid numeric token regex"));

/// First run of digits in a file name, e.g. `boat12.png` → `"12"`.
pub fn numeric_token(file_name: &str) -> Option<&str> {
    NUMERIC_TOKEN.find(file_name).map(|found| found.as_str())
}

/// Orders two digit runs by value without parsing, so runs of any length compare.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numbered files ascend by number; unnumbered ones follow in name order.
pub fn compare_file_names(a: &str, b: &str) -> Ordering {
    match (numeric_token(a), numeric_token(b)) {
        (Some(lhs), Some(rhs)) => compare_digit_runs(lhs, rhs).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub file_name: String,
    pub reference: String,
}

pub fn sort_images(images: &mut [GalleryImage]) {
    images.sort_by(|a, b| {
        compare_file_names(&a.file_name, &b.file_name).then_with(|| a.reference.cmp(&b.reference))
    });
}
