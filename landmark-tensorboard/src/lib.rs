//! Writes training statistics to TFRecord files read by TensorBoard.
use landmark_core::record::{Record, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "opt_steps".to_string(),
        }
    }

    /// Flushes pending events to the file.
    pub fn flush(&mut self) {
        self.writer.flush();
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// The x-axis is the value of `opt_steps` in the record. Records without
    /// it are discarded. [`RecordValue::Array1`] is written as one scalar per
    /// element, keyed `<key>/<index>`.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without {} is discarded", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                RecordValue::Array1(vs) => {
                    for (i, v) in vs.iter().enumerate() {
                        self.writer.add_scalar(&format!("{}/{}", k, i), *v, step);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_write_records() -> std::io::Result<()> {
        let dir = TempDir::new("tensorboard")?;
        let mut recorder = TensorboardRecorder::new(dir.path());

        let mut record = Record::from_scalar("opt_steps", 100.);
        record.insert("expreplay/mean_score", RecordValue::Scalar(1.5));
        record.insert("q_values", RecordValue::Array1(vec![0.1, 0.2]));
        recorder.write(record);

        // Discarded, no step
        recorder.write(Record::from_scalar("loss", 0.3));
        recorder.flush();

        assert!(std::fs::read_dir(dir.path())?.next().is_some());
        Ok(())
    }
}
