pub mod binning;
pub mod fft;
pub mod normalize;
