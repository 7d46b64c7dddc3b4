//! Training data loading.
//!
//! A dataset is a bias-free feature matrix paired with a target column. The CSV loader
//! expects a header row followed by numeric records, the target being the last column.

use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Features and targets of a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Tensor<f64>,
    y: Tensor<f64>,
}

impl Dataset {
    /// Pairs a feature matrix with its targets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `x` is not a matrix, `y` is not a column,
    /// or their row counts differ.
    pub fn new(x: Tensor<f64>, y: Tensor<f64>) -> Result<Self> {
        let y = y.into_column()?;
        if x.rank() != 2 || x.rows() != y.rows() {
            return Err(Error::DimensionMismatch {
                op: "dataset",
                left: x.shape().to_vec(),
                right: y.shape().to_vec(),
            });
        }
        Ok(Self { x, y })
    }

    /// Builds a dataset from records whose last value is the target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedRow`] if a record's width differs from the first record's,
    /// and [`Error::EmptyDataset`] if a record has no values at all.
    pub fn from_records(records: &[Vec<f64>]) -> Result<Self> {
        let width = records.first().map_or(1, Vec::len);
        if width == 0 {
            return Err(Error::EmptyDataset);
        }

        let mut features = Vec::with_capacity(records.len() * (width - 1));
        let mut targets = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            if record.len() != width {
                return Err(Error::RaggedRow {
                    row,
                    expected: width,
                    got: record.len(),
                });
            }
            let (target, values) = record.split_last().ok_or(Error::EmptyDataset)?;
            features.extend_from_slice(values);
            targets.push(*target);
        }

        let x = Tensor::new(features, vec![records.len(), width - 1])?;
        Self::new(x, Tensor::column(targets))
    }

    /// Reads a CSV file. See [`from_csv_reader`](Dataset::from_csv_reader).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`] if the file can't be opened or read, plus the errors of
    /// [`from_csv_reader`](Dataset::from_csv_reader).
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    /// Reads CSV data with a header row; every field must be a number and the last column
    /// of each record is the target.
    ///
    /// # Errors
    ///
    /// - [`Error::Csv`] on malformed CSV.
    /// - [`Error::Parse`] for a field that is not a number.
    /// - [`Error::RaggedRow`] for a record wider or narrower than the first one.
    ///
    /// # Examples
    ///
    /// ```
    /// use linfit::Dataset;
    ///
    /// let data = "size,price\n1.0,2.0\n2.0,4.0\n";
    /// let dataset = Dataset::from_csv_reader(data.as_bytes()).unwrap();
    ///
    /// assert_eq!(2, dataset.n_samples());
    /// assert_eq!(1, dataset.n_features());
    /// ```
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut records = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let values = record
                .iter()
                .enumerate()
                .map(|(column, field)| {
                    field.parse::<f64>().map_err(|_| Error::Parse {
                        row,
                        column,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            records.push(values);
        }
        log::debug!("read {} records", records.len());

        Self::from_records(&records)
    }

    /// Bias-free feature matrix, one row per sample.
    pub fn x(&self) -> &Tensor<f64> {
        &self.x
    }

    /// Target column.
    pub fn y(&self) -> &Tensor<f64> {
        &self.y
    }

    pub fn n_samples(&self) -> usize {
        self.x.rows()
    }

    pub fn n_features(&self) -> usize {
        self.x.cols()
    }
}
