use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::{Result, SpectroError};

/// Radix-2 decimation-in-time FFT, computed in place.
///
/// Equivalent to the textbook recursion (transform the even- and odd-indexed
/// halves, then combine with `t = exp(-2πi·k/N) · odd[k]`), unrolled into a
/// bit-reversal permutation followed by `log2(N)` butterfly passes so large
/// windows neither recurse nor reallocate.
///
/// Lengths `0` and `1` are returned unchanged. Any other length must be a
/// power of two; callers pad with [`transform_len`] first.
pub fn forward(buffer: &mut [Complex64]) -> Result<()> {
    let n = buffer.len();
    if n <= 1 {
        return Ok(());
    }
    if !n.is_power_of_two() {
        return Err(SpectroError::Dsp(format!(
            "transform length {} is not a power of two",
            n
        )));
    }

    bit_reverse_permute(buffer);

    // exp(-2πi·k/N) for k in [0, N/2); a pass over blocks of size `2 * half`
    // uses every (N / (2 * half))-th entry.
    let twiddles: Vec<Complex64> = (0..n / 2)
        .map(|k| Complex64::from_polar(1.0, -TAU * k as f64 / n as f64))
        .collect();

    let mut half = 1;
    while half < n {
        let stride = n / (2 * half);
        for block in buffer.chunks_exact_mut(2 * half) {
            let (even, odd) = block.split_at_mut(half);
            for (k, (e, o)) in even.iter_mut().zip(odd.iter_mut()).enumerate() {
                let t = twiddles[k * stride] * *o;
                *o = *e - t;
                *e += t;
            }
        }
        half *= 2;
    }

    Ok(())
}

/// Inverse transform: conjugate, forward, conjugate, scale by `1/N`.
pub fn inverse(buffer: &mut [Complex64]) -> Result<()> {
    let n = buffer.len();
    if n == 0 {
        return Ok(());
    }

    buffer.iter_mut().for_each(|c| *c = c.conj());
    forward(buffer)?;

    let scale = 1.0 / n as f64;
    buffer.iter_mut().for_each(|c| *c = c.conj() * scale);
    Ok(())
}

/// Length a window of `n` samples is zero-padded to before [`forward`].
pub fn transform_len(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

fn bit_reverse_permute(buffer: &mut [Complex64]) {
    let n = buffer.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            buffer.swap(i, j);
        }
    }
}
