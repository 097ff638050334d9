use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default output filename with format: argo-{variable}-mean-{YYMMDD}.parquet
pub fn generate_default_output_filename(variable: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "argo-{}-mean-{:02}{:02}{:02}.parquet",
        variable.to_lowercase(),
        year,
        month,
        day
    );
    PathBuf::from("output").join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_output_filename() {
        let filename = generate_default_output_filename("DOXY_ADJUSTED");
        let filename_str = filename.to_string_lossy();

        assert!(filename_str.starts_with("output/"));
        assert!(filename_str.ends_with(".parquet"));

        let file_part = filename.file_name().unwrap().to_string_lossy();
        assert!(file_part.starts_with("argo-doxy_adjusted-mean-"));
        // "argo-doxy_adjusted-mean-" + YYMMDD + ".parquet"
        assert_eq!(file_part.len(), 24 + 6 + 8);
    }
}
