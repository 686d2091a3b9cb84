use crate::foundation::error::SynthResult;
use crate::pipeline::sample::Sample;

/// Destination for finished samples, fed in identity order.
pub trait SampleSink {
    fn write_sample(&mut self, sample: &Sample) -> SynthResult<()>;

    /// Called once after the last sample.
    fn finish(&mut self) -> SynthResult<()> {
        Ok(())
    }
}

/// Keeps every sample in memory. Handy for tests and library callers.
#[derive(Debug, Default)]
pub struct InMemorySampleSink {
    pub samples: Vec<Sample>,
    pub finished: bool,
}

impl SampleSink for InMemorySampleSink {
    fn write_sample(&mut self, sample: &Sample) -> SynthResult<()> {
        self.samples.push(sample.clone());
        Ok(())
    }

    fn finish(&mut self) -> SynthResult<()> {
        self.finished = true;
        Ok(())
    }
}
