/// Binned magnitudes, one row per window and one column per band.
///
/// Row-major: `data[chunk * num_levels + level]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnitudeGrid {
    data: Vec<u64>,
    num_chunks: usize,
    num_levels: usize,
}

impl MagnitudeGrid {
    pub fn zeros(num_chunks: usize, num_levels: usize) -> Self {
        Self {
            data: vec![0; num_chunks * num_levels],
            num_chunks,
            num_levels,
        }
    }

    #[inline]
    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }

    #[inline]
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    #[inline]
    pub fn get(&self, chunk: usize, level: usize) -> u64 {
        self.data[chunk * self.num_levels + level]
    }

    /// All bands of window `chunk`.
    #[inline]
    pub fn row(&self, chunk: usize) -> &[u64] {
        let start = chunk * self.num_levels;
        &self.data[start..start + self.num_levels]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.data.chunks_exact(self.num_levels)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.data
    }

    pub fn max(&self) -> u64 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
