//! Shared CLI utilities.

use collect::Data;
use std::collections::BTreeMap;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns an empty list when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Vec<String> {
    value
        .as_ref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

/// `key=value` lines sorted by key, one line per value.
pub fn format_data(data: &Data) -> String {
    let sorted: BTreeMap<&str, &[String]> = data.iter().collect();
    let mut out = String::new();
    for (key, values) in sorted {
        if values.is_empty() {
            out.push_str(&format!("{key}=\n"));
        }
        for value in values {
            out.push_str(&format!("{key}={value}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_trims_and_skips_empty() {
        assert_eq!(parse_csv(&Some(" port, ,host ".to_string())), vec!["port", "host"]);
        assert!(parse_csv(&None).is_empty());
    }

    #[test]
    fn format_data_sorts_keys_and_repeats_multi_values() {
        let mut data = Data::new();
        data.set("b", ["2"]);
        data.set("a", ["x", "y"]);
        data.set("empty", Vec::<String>::new());
        assert_eq!(format_data(&data), "a=x\na=y\nb=2\nempty=\n");
    }
}
