/// Integer PCM sample that can be mapped onto `[-1.0, 1.0]`.
///
/// The divisor is the largest positive value of the sample's bit width, so
/// it never depends on the data. The most negative value lands slightly
/// below -1.0 and is left unclamped.
pub trait PcmSample: Copy + Send + Sync + 'static {
    /// Positive full-scale value, e.g. `2^31 - 1` for `i32`.
    const FULL_SCALE: f64;

    fn to_i64(self) -> i64;

    #[inline]
    fn normalize(self) -> f64 {
        self.to_i64() as f64 / Self::FULL_SCALE
    }
}

macro_rules! impl_pcm_sample {
    ($($t:ty),*) => {
        $(
            impl PcmSample for $t {
                const FULL_SCALE: f64 = <$t>::MAX as f64;

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }
            }
        )*
    };
}

impl_pcm_sample!(i8, i16, i32);

/// Running extremes of the raw and normalized sample values.
///
/// Purely diagnostic: nothing in the pipeline reads these back. Stats from
/// separate windows can be merged in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub min_raw: i64,
    pub max_raw: i64,
    pub min_normalized: f64,
    pub max_normalized: f64,
    pub count: usize,
}

impl Default for SampleStats {
    fn default() -> Self {
        Self {
            min_raw: i64::MAX,
            max_raw: i64::MIN,
            min_normalized: f64::INFINITY,
            max_normalized: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl SampleStats {
    /// Normalizes `sample`, records it, and returns the normalized value.
    #[inline]
    pub fn observe<S: PcmSample>(&mut self, sample: S) -> f64 {
        let raw = sample.to_i64();
        let value = sample.normalize();
        self.min_raw = self.min_raw.min(raw);
        self.max_raw = self.max_raw.max(raw);
        self.min_normalized = self.min_normalized.min(value);
        self.max_normalized = self.max_normalized.max(value);
        self.count += 1;
        value
    }

    pub fn merge(self, other: SampleStats) -> SampleStats {
        SampleStats {
            min_raw: self.min_raw.min(other.min_raw),
            max_raw: self.max_raw.max(other.max_raw),
            min_normalized: self.min_normalized.min(other.min_normalized),
            max_normalized: self.max_normalized.max(other.max_normalized),
            count: self.count + other.count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
