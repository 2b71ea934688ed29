//! Encode/decode contracts at the filesystem boundary (spec.md §6): the
//! leaf-list JSON codec, and CSV read/write for training data, posterior
//! samples, histograms, and predictions. Grounded on `gfs/app/io.py`; the
//! `BufWriter`/directory-creation shape follows the teacher's
//! `src/io.rs::write_matrix_tsv`.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::elements::{DataPoint, Distribution, Parameter, PosteriorSamples};
use crate::error::Error;
use crate::geometry::{Leaf, Side};
use crate::leaflist::LeafList;
use crate::models::PreprocessorKind;

impl Serialize for Side {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.endpoint, self.bit_depth).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (endpoint, bit_depth) = <(u64, u32)>::deserialize(deserializer)?;
        Ok(Side::new(endpoint, bit_depth))
    }
}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.multiplicity, &self.sides).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Leaf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (multiplicity, sides) = <(u32, Vec<Side>)>::deserialize(deserializer)?;
        Ok(Leaf::new(multiplicity, sides))
    }
}

impl Serialize for LeafList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for leaf in &self.0 {
            seq.serialize_element(leaf)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for LeafList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LeafListVisitor;
        impl<'de> Visitor<'de> for LeafListVisitor {
            type Value = LeafList;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an array of [multiplicity, [[endpoint, bit_depth], ...]] leaves")
            }
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LeafList, A::Error> {
                let mut leaves = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(leaf) = seq.next_element::<Leaf>()? {
                    leaves.push(leaf);
                }
                Ok(LeafList(leaves))
            }
        }
        deserializer.deserialize_seq(LeafListVisitor)
    }
}

fn make_parent_dir(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn load_leaves(path: &Path) -> Result<LeafList, Error> {
    let contents = fs::read_to_string(path)?;
    let leaves: LeafList = serde_json::from_str(&contents)?;
    log::info!("loaded leaves: {}", path.display());
    Ok(leaves)
}

pub fn export_leaves(leaves: &LeafList, path: &Path) -> Result<(), Error> {
    make_parent_dir(path)?;
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), leaves)?;
    log::info!("exported leaves: {}", path.display());
    Ok(())
}

pub fn load_training_data(
    path: &Path,
    preprocessor: &PreprocessorKind,
) -> Result<Vec<DataPoint>, Error> {
    let mut reader = ReaderBuilder::new().has_headers(false).from_path(path)?;
    let mut data = Vec::new();
    for record in reader.records() {
        data.push(preprocessor.process_row(&record?)?);
    }
    log::info!("loaded training data: {}", path.display());
    Ok(data)
}

/// Input-data CSV for `predict` shares the training data's `(id, y)` shape,
/// parsed by the same preprocessor.
pub fn load_input_data(
    path: &Path,
    preprocessor: &PreprocessorKind,
) -> Result<Vec<DataPoint>, Error> {
    load_training_data(path, preprocessor)
}

pub fn load_posterior_samples(path: &Path) -> Result<PosteriorSamples, Error> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let axes: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let values: Result<Vec<f64>, _> = record.iter().map(|v| v.parse::<f64>()).collect();
        let values = values.map_err(|e| Error::Data(format!("invalid sample row: {e}")))?;
        samples.push(Parameter::new(values)?);
    }
    log::info!("loaded posterior samples: {}", path.display());
    Ok(PosteriorSamples::new(axes, samples))
}

pub fn export_posterior_samples(samples: &PosteriorSamples, path: &Path) -> Result<(), Error> {
    make_parent_dir(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(&samples.axes)?;
    for sample in &samples.samples {
        writer.write_record(sample.values().iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    log::info!("exported posterior samples: {}", path.display());
    Ok(())
}

/// Counts distinct parameter tuples, keyed by bit pattern (exact since every
/// sample value is a deterministic function of an integer grid coordinate),
/// and writes axis coordinates plus count, covering only grid points that
/// occurred.
pub fn export_histogram(samples: &PosteriorSamples, path: &Path) -> Result<(), Error> {
    make_parent_dir(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    let mut header = samples.axes.clone();
    header.push("count".to_string());
    writer.write_record(&header)?;

    let mut counts: std::collections::HashMap<Vec<u64>, (Vec<f64>, u64)> =
        std::collections::HashMap::new();
    for sample in &samples.samples {
        let key: Vec<u64> = sample.values().iter().map(|v| v.to_bits()).collect();
        let entry = counts.entry(key).or_insert_with(|| (sample.values().to_vec(), 0));
        entry.1 += 1;
    }
    for (values, count) in counts.values() {
        let mut row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        row.push(count.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;
    log::info!("exported histogram: {}", path.display());
    Ok(())
}

pub fn export_prediction(
    prediction: &Distribution,
    categories: &[String],
    path: &Path,
) -> Result<(), Error> {
    make_parent_dir(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(categories)?;
    writer.write_record(prediction.values().iter().map(|v| v.to_string()))?;
    writer.flush()?;
    log::info!("exported prediction: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side as GeomSide;

    #[test]
    fn leaf_list_round_trips_through_the_tuple_array_json_shape() {
        let leaves = LeafList(vec![
            Leaf::new(2, vec![GeomSide::new(0, 1), GeomSide::new(4, 2)]),
            Leaf::new(0, vec![GeomSide::new(8, 0), GeomSide::new(0, 3)]),
        ]);
        let json = serde_json::to_string(&leaves).unwrap();
        assert_eq!(json, "[[2,[[0,1],[4,2]]],[0,[[8,0],[0,3]]]]");

        let round_tripped: LeafList = serde_json::from_str(&json).unwrap();
        assert_eq!(round_tripped.0, leaves.0);
    }

    #[test]
    fn empty_leaf_list_round_trips() {
        let leaves = LeafList::new();
        let json = serde_json::to_string(&leaves).unwrap();
        assert_eq!(json, "[]");
        let round_tripped: LeafList = serde_json::from_str(&json).unwrap();
        assert!(round_tripped.is_empty());
    }

    #[test]
    fn load_training_data_parses_binomial_rows() {
        let dir = std::env::temp_dir().join(format!("gfs-sample-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("train.csv");
        fs::write(&path, "0,1\n1,0\n2,1\n").unwrap();

        let preprocessor = PreprocessorKind::resolve("binomial").unwrap();
        let data = load_training_data(&path, &preprocessor).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].value, vec![1]);
        assert_eq!(data[1].value, vec![0]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn export_then_load_posterior_samples_round_trips() {
        let dir = std::env::temp_dir()
            .join(format!("gfs-sample-test-samples-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("samples.csv");

        let samples = PosteriorSamples::new(
            vec!["p".to_string()],
            vec![Parameter::new(vec![0.25]).unwrap(), Parameter::new(vec![0.75]).unwrap()],
        );
        export_posterior_samples(&samples, &path).unwrap();
        let loaded = load_posterior_samples(&path).unwrap();
        assert_eq!(loaded.axes, vec!["p".to_string()]);
        assert_eq!(loaded.samples.len(), 2);

        fs::remove_dir_all(&dir).ok();
    }
}


