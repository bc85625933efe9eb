use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;

/// How a band resolves a transform index that falls outside `[0, len)`.
///
/// Band 0 reaches below index 0 through its `m·ls − l` terms, and when there
/// are more bands than usable bins the upper bands run past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Index modulo `len`. `X[-l]` is `X[N-l]`, whose real part equals
    /// `X[l]`'s for a real-valued input, so band 0 mirrors around DC.
    #[default]
    Wrap,
    /// Clamp to the nearest valid index.
    Clamp,
    /// Out-of-range terms contribute nothing.
    Skip,
}

impl EdgePolicy {
    /// Maps a possibly out-of-range index onto the buffer, or `None` to skip it.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if index >= 0 && (index as usize) < len {
            return Some(index as usize);
        }
        match self {
            EdgePolicy::Wrap => Some(index.rem_euclid(len as isize) as usize),
            EdgePolicy::Clamp => Some(index.clamp(0, len as isize - 1) as usize),
            EdgePolicy::Skip => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgePolicy::Wrap => "wrap",
            EdgePolicy::Clamp => "clamp",
            EdgePolicy::Skip => "skip",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" => Ok(EdgePolicy::Wrap),
            "clamp" => Ok(EdgePolicy::Clamp),
            "skip" => Ok(EdgePolicy::Skip),
            other => Err(format!(
                "unknown edge policy '{}'. Choices: wrap, clamp, skip",
                other
            )),
        }
    }
}

/// Number of transform bins summed on each side of a band center.
///
/// The `/ 4` keeps the bands inside the lower quarter of the spectrum: half
/// of the output is negative frequencies, and the top of the positive half
/// carries little energy for typical audio.
pub fn level_size(len: usize, num_levels: usize) -> usize {
    (len / num_levels.max(1) / 4).max(1)
}

/// Aggregates one transformed window into `out.len()` bands.
///
/// Band `m` sums `|re|` at `m·ls + l` and `m·ls − l` for `l` in `[0, ls)`
/// (the center bin is counted twice), then rounds to the nearest integer.
pub fn bin_into(spectrum: &[Complex64], level_size: usize, policy: EdgePolicy, out: &mut [u64]) {
    let len = spectrum.len();
    let ls = level_size as isize;

    for (m, band) in out.iter_mut().enumerate() {
        let center = m as isize * ls;
        let mut magnitude = 0.0f64;
        for l in 0..ls {
            if let Some(i) = policy.resolve(center + l, len) {
                magnitude += spectrum[i].re.abs();
            }
            if let Some(i) = policy.resolve(center - l, len) {
                magnitude += spectrum[i].re.abs();
            }
        }
        *band = magnitude.round() as u64;
    }
}

/// Convenience wrapper around [`bin_into`] that sizes the bands from the
/// spectrum length.
pub fn bin_magnitudes(spectrum: &[Complex64], num_levels: usize, policy: EdgePolicy) -> Vec<u64> {
    let mut out = vec![0u64; num_levels];
    bin_into(spectrum, level_size(spectrum.len(), num_levels), policy, &mut out);
    out
}
