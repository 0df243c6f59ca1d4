use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// Writing is fire-and-forget: implementations handle their own failures.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}
