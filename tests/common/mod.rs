#![allow(dead_code)]

use arrow::array::{ArrayRef, Float32Array, Float64Array, Int8Array, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One profile level as stored in a partition.
#[derive(Debug, Clone, Copy)]
pub struct Level {
    pub latitude: f64,
    pub longitude: f64,
    pub pres: f32,
    pub doxy: Option<f32>,
    pub doxy_qc: i8,
    pub juld_ms: i64,
}

impl Level {
    pub fn new(latitude: f64, longitude: f64, pres: f32, doxy: Option<f32>, doxy_qc: i8) -> Self {
        Self {
            latitude,
            longitude,
            pres,
            doxy,
            doxy_qc,
            juld_ms: 1_577_836_800_000, // 2020-01-01T00:00:00Z
        }
    }

    pub fn at(mut self, juld_ms: i64) -> Self {
        self.juld_ms = juld_ms;
        self
    }
}

pub fn levels_batch(levels: &[Level]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("LATITUDE", DataType::Float64, true),
        Field::new("LONGITUDE", DataType::Float64, true),
        Field::new("PRES", DataType::Float32, true),
        Field::new("DOXY", DataType::Float32, true),
        Field::new("DOXY_QC", DataType::Int8, true),
        Field::new(
            "JULD",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from_iter_values(levels.iter().map(|l| l.latitude))),
        Arc::new(Float64Array::from_iter_values(levels.iter().map(|l| l.longitude))),
        Arc::new(Float32Array::from_iter_values(levels.iter().map(|l| l.pres))),
        Arc::new(Float32Array::from(levels.iter().map(|l| l.doxy).collect::<Vec<_>>())),
        Arc::new(Int8Array::from_iter_values(levels.iter().map(|l| l.doxy_qc))),
        Arc::new(TimestampMillisecondArray::from_iter_values(
            levels.iter().map(|l| l.juld_ms),
        )),
    ];

    RecordBatch::try_new(schema, columns).expect("valid test batch")
}

pub fn write_batch(path: &Path, batch: &RecordBatch, row_group_size: usize) -> PathBuf {
    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size)
        .build();
    let file = File::create(path).expect("create partition");
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).expect("create writer");
    writer.write(batch).expect("write batch");
    writer.close().expect("close writer");
    path.to_path_buf()
}

pub fn write_partition(dir: &Path, name: &str, levels: &[Level]) -> PathBuf {
    write_batch(&dir.join(name), &levels_batch(levels), 1024)
}

/// `count` partitions of `per_partition` levels each, with overlapping
/// locations across partitions.
pub fn write_dataset(dir: &Path, count: usize, per_partition: usize) {
    for p in 0..count {
        let levels: Vec<Level> = (0..per_partition)
            .map(|i| {
                let location = (i % 7) as f64;
                Level::new(
                    location,
                    -location,
                    (i * 5 + p) as f32,
                    if i % 11 == 0 { None } else { Some((p * 100 + i) as f32) },
                    if i % 4 == 0 { 4 } else { 1 },
                )
            })
            .collect();
        write_partition(dir, &format!("part-{:03}.parquet", p), &levels);
    }
}
