use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::filters::BoundingBox;

#[derive(Parser)]
#[command(name = "argo-processor")]
#[command(about = "Filtered reads and spatial averaging over partitioned Argo profile data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Pipeline configuration file (TOML, YAML or JSON)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Describe a partitioned dataset directory
    Info {
        #[arg(short, long, help = "Dataset directory of Parquet partitions")]
        dataset: PathBuf,
    },

    /// Average one variable per float location
    Map {
        #[arg(short, long, help = "Dataset directory of Parquet partitions")]
        dataset: PathBuf,

        #[arg(long, help = "Measurement variable, e.g. DOXY or TEMP")]
        variable: String,

        #[arg(long, help = "Use the {VARIABLE}_ADJUSTED column")]
        adjusted: bool,

        #[arg(long, help = "Minimum pressure (dbar), inclusive")]
        pres_min: Option<f64>,

        #[arg(long, help = "Maximum pressure (dbar), inclusive")]
        pres_max: Option<f64>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Accepted QC codes [default: from configuration]"
        )]
        qc_codes: Option<Vec<i64>>,

        #[arg(long, help = "Window start, RFC 3339")]
        start: Option<DateTime<Utc>>,

        #[arg(long, help = "Window end, RFC 3339")]
        end: Option<DateTime<Utc>>,

        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Bounding box MINLAT,MAXLAT,MINLON,MAXLON"
        )]
        bbox: Option<BoundingBox>,

        #[arg(long, help = "Read partitions one at a time")]
        serial: bool,

        #[arg(long, help = "Worker threads [default: from configuration]")]
        max_workers: Option<usize>,

        #[arg(
            short,
            long,
            help = "Write Parquet output [default path: output/argo-{variable}-mean-{YYMMDD}.parquet]"
        )]
        output: Option<Option<PathBuf>>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, help = "Print aggregated rows as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_arguments() {
        let cli = Cli::try_parse_from([
            "argo-processor",
            "map",
            "--dataset",
            "data/2_bgc_argo-qc",
            "--variable",
            "DOXY",
            "--pres-max",
            "50",
            "--qc-codes",
            "1,2",
            "--bbox",
            "-10,10,-20,20",
            "--output",
        ])
        .unwrap();

        match cli.command {
            Commands::Map {
                variable,
                pres_max,
                qc_codes,
                bbox,
                output,
                serial,
                ..
            } => {
                assert_eq!(variable, "DOXY");
                assert_eq!(pres_max, Some(50.0));
                assert_eq!(qc_codes, Some(vec![1, 2]));
                assert_eq!(bbox.unwrap().max_lon, 20.0);
                assert_eq!(output, Some(None));
                assert!(!serial);
            }
            _ => panic!("expected map command"),
        }
    }

    #[test]
    fn test_rejects_bad_bbox() {
        let result = Cli::try_parse_from([
            "argo-processor",
            "map",
            "--dataset",
            "d",
            "--variable",
            "DOXY",
            "--bbox",
            "10,-10,0,0",
        ]);
        assert!(result.is_err());
    }
}
