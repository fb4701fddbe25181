use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

/// Collapse whitespace and rewrite `?` placeholders to Postgres `$N`
/// parameters, so multi-line queries stay readable at the call site.
pub fn sql(query: &str) -> String {
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\?").expect("placeholder pattern"));
    let mut result = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 1;
    while let Some(mat) = re.find(&result) {
        let replacement = format!("${}", param_index);
        result.replace_range(mat.range(), &replacement);
        param_index += 1;
    }
    result
}
