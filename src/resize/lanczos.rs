use rayon::prelude::*;

const SUPPORT: f32 = 3.0;

fn sinc(t: f32) -> f32 {
    if t == 0.0 {
        1.0
    } else {
        let a = t * std::f32::consts::PI;
        a.sin() / a
    }
}

fn lanczos3(x: f32) -> f32 {
    if x.abs() < SUPPORT {
        sinc(x) * sinc(x / SUPPORT)
    } else {
        0.0
    }
}

/// Normalized filter taps for one output coordinate.
pub(crate) struct Taps {
    pub(crate) left: usize,
    pub(crate) weights: Vec<f32>,
}

/// Compute the taps mapping `src_len` samples onto `dst_len` samples.
///
/// Downscaling widens the kernel by the scale ratio so every source sample contributes.
pub(crate) fn taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let ratio = src_len as f32 / dst_len as f32;
    let sratio = if ratio < 1.0 { 1.0 } else { ratio };
    let src_support = SUPPORT * sratio;

    (0..dst_len)
        .map(|out| {
            let center = (out as f32 + 0.5) * ratio;
            let left = ((center - src_support).floor() as i64).clamp(0, i64::from(src_len) - 1);
            let right = ((center + src_support).ceil() as i64).clamp(left + 1, i64::from(src_len));
            let center = center - 0.5;

            let mut weights = Vec::with_capacity((right - left) as usize);
            let mut sum = 0.0f32;
            for i in left..right {
                let w = lanczos3((i as f32 - center) / sratio);
                weights.push(w);
                sum += w;
            }
            if sum != 0.0 {
                for w in &mut weights {
                    *w /= sum;
                }
            }
            Taps {
                left: left as usize,
                weights,
            }
        })
        .collect()
}

/// Vertical pass: `src` (u8, `w x src_h`) into `f32` rows of height `dst_h`.
pub(crate) fn vertical_pass(src: &[u8], w: u32, src_h: u32, dst_h: u32) -> Vec<f32> {
    let row_len = w as usize * 4;
    let taps = taps(src_h, dst_h);
    let mut out = vec![0.0f32; row_len * dst_h as usize];
    out.par_chunks_mut(row_len)
        .zip(taps.par_iter())
        .for_each(|(dst_row, t)| {
            for (k, &weight) in t.weights.iter().enumerate() {
                let src_row = &src[(t.left + k) * row_len..(t.left + k + 1) * row_len];
                for (d, &s) in dst_row.iter_mut().zip(src_row) {
                    *d += f32::from(s) * weight;
                }
            }
        });
    out
}

/// Horizontal pass: `f32` rows of width `src_w` into u8 rows of width `dst_w`.
pub(crate) fn horizontal_pass(tmp: &[f32], src_w: u32, h: u32, dst_w: u32) -> Vec<u8> {
    let src_row_len = src_w as usize * 4;
    let dst_row_len = dst_w as usize * 4;
    let taps = taps(src_w, dst_w);
    let mut out = vec![0u8; dst_row_len * h as usize];
    out.par_chunks_mut(dst_row_len)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_row = &tmp[y * src_row_len..(y + 1) * src_row_len];
            for (x, t) in taps.iter().enumerate() {
                let mut acc = [0.0f32; 4];
                for (k, &weight) in t.weights.iter().enumerate() {
                    let px = &src_row[(t.left + k) * 4..(t.left + k) * 4 + 4];
                    for c in 0..4 {
                        acc[c] += px[c] * weight;
                    }
                }
                for c in 0..4 {
                    dst_row[x * 4 + c] = acc[c].clamp(0.0, 255.0).round() as u8;
                }
            }
        });
    out
}

/// Keep color channels at or below alpha after filter ringing.
pub(crate) fn clamp_premul(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }
}
