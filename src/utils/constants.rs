/// Column name suffixes
pub const QC_SUFFIX: &str = "_QC";
pub const ADJUSTED_SUFFIX: &str = "_ADJUSTED";

/// Default column names
pub const LATITUDE_COLUMN: &str = "LATITUDE";
pub const LONGITUDE_COLUMN: &str = "LONGITUDE";
pub const TIME_COLUMN: &str = "JULD";
pub const PRESSURE_COLUMN: &str = "PRES";

/// Quality-control codes
pub const QC_GOOD: i64 = 1;

/// Partition files
pub const PARTITION_EXTENSION: &str = "parquet";

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 8192;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
