//! Provides [`DatasetReader`], a CSV reader for labeled datasets.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::instance::DataInstance;
use super::labeled::LabeledDataset;


/// Reads a CSV file into a [`LabeledDataset`].
///
/// One column holds the integer label; every other column is a feature.
/// With a header the label column is selected by name through
/// [`target_feature`](DatasetReader::target_feature); without one, the
/// last column is the label.
///
/// # Example
/// ```no_run
/// use activeboost::DatasetReader;
///
/// let dataset = DatasetReader::default()
///     .file("data/train.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// ```
pub struct DatasetReader {
    file: Option<PathBuf>,
    has_header: bool,
    target: Option<String>,
}


impl Default for DatasetReader {
    fn default() -> Self {
        Self { file: None, has_header: false, target: None }
    }
}


impl DatasetReader {
    /// Set the file to read.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }


    /// Declare whether the first line is a header.
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }


    /// Name of the label column. Requires a header.
    pub fn target_feature<S: ToString>(mut self, name: S) -> Self {
        self.target = Some(name.to_string());
        self
    }


    /// Read the file into a dataset.
    /// The allowed-label set is the set of distinct labels observed.
    pub fn read(self) -> io::Result<LabeledDataset> {
        let path = self.file
            .expect("No file is specified. Use `DatasetReader::file`");
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();

        let mut target_index = None;
        if self.has_header {
            let header = lines.next()
                .expect("The file is empty")?;
            let names = header.split(',')
                .map(str::trim)
                .collect::<Vec<_>>();

            let target = self.target.as_deref()
                .expect("A header requires `DatasetReader::target_feature`");
            let position = names.iter()
                .position(|name| *name == target)
                .unwrap_or_else(|| {
                    panic!("The target column {target:?} does not exist")
                });
            target_index = Some(position);
        }

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let mut values = line.split(',')
                .map(|x| x.trim().parse::<f64>().expect("Failed to parse a value"))
                .collect::<Vec<_>>();

            // without a header the label is the last column
            let index = target_index.unwrap_or(values.len() - 1);
            let label = values.remove(index) as i8;

            rows.push(values);
            labels.push(label);
        }

        let mut dataset = LabeledDataset::new(labels.iter().copied());
        for (features, label) in rows.into_iter().zip(labels) {
            dataset.push(DataInstance::new(features), label);
        }
        Ok(dataset)
    }
}
