use rayon::prelude::*;

use crate::effect::{Loupe, Mixer2};
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::pixels::frame::FrameBuffer;

/// Threading controls for multi-frame rendering.
#[derive(Clone, Debug, Default)]
pub struct SequenceThreading {
    /// Render frames on a worker pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// `count` evenly spaced time values from `start` to `end` inclusive.
pub fn sample_times(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => (0..n)
            .map(|i| start + (end - start) * (i as f64) / ((n - 1) as f64))
            .collect(),
    }
}

/// Render `source` once per entry of `times`, in order.
///
/// Every frame is independent, so parallel and serial rendering produce identical output.
/// Each worker renders with its own copy of the effect instance.
pub fn render_sequence(
    effect: &Loupe,
    source: &FrameBuffer,
    times: &[f64],
    threading: &SequenceThreading,
) -> LoupeResult<Vec<FrameBuffer>> {
    if source.canvas() != effect.canvas() {
        return Err(LoupeError::validation(format!(
            "source frame is {}x{}, effect expects {}x{}",
            source.canvas().width,
            source.canvas().height,
            effect.canvas().width,
            effect.canvas().height
        )));
    }

    let render_one = |fx: &mut Loupe, time: f64| -> LoupeResult<FrameBuffer> {
        let mut out = FrameBuffer::new(source.canvas());
        fx.update(time, &mut out.view_mut(), &source.view(), &source.view())?;
        Ok(out)
    };

    if !threading.parallel {
        let mut fx = effect.clone();
        return times.iter().map(|&t| render_one(&mut fx, t)).collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    tracing::debug!(
        frames = times.len(),
        threads = pool.current_num_threads(),
        "parallel sequence"
    );
    pool.install(|| {
        times
            .par_iter()
            .map_init(|| effect.clone(), |fx, &t| render_one(fx, t))
            .collect()
    })
}

fn build_thread_pool(threads: Option<usize>) -> LoupeResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        if n == 0 {
            return Err(LoupeError::validation("thread count must be > 0"));
        }
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LoupeError::Other(anyhow::anyhow!("failed to build rayon pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/sequence/sequence.rs"]
mod tests;
