use std::sync::Arc;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps};
use crate::resize::SoftwareResizer;

const CANVAS: Canvas = Canvas {
    width: 18,
    height: 32,
};

fn timeline(renderer: &Renderer, duration: f64) -> Timeline {
    let images = vec![
        FrameRGBA::solid(9, 16, [200, 0, 0, 255]),
        FrameRGBA::solid(16, 9, [0, 0, 200, 255]),
    ];
    Timeline::build(
        &images,
        duration,
        Vec::new(),
        CANVAS,
        Fps { num: 4, den: 1 },
        Arc::new(SoftwareResizer),
        renderer.pool(),
        &CancelToken::new(),
    )
    .unwrap()
}

fn renderer(chunk_size: usize) -> Renderer {
    Renderer::new(&RenderThreading {
        chunk_size,
        threads: Some(2),
    })
    .unwrap()
}

/// Cancels the shared token once `after` frames were accepted.
struct CancellingSink {
    inner: InMemorySink,
    token: CancelToken,
    after: usize,
}

impl FrameSink for CancellingSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.inner.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        self.inner.push_frame(idx, frame)?;
        if self.inner.frames().len() >= self.after {
            self.token.cancel();
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.inner.end()
    }

    fn abort(&mut self) {
        self.inner.abort();
    }
}

struct FailingSink;

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        Err(ReelError::encode("disk full"))
    }

    fn end(&mut self) -> ReelResult<()> {
        panic!("end must not be called after a failed push");
    }
}

#[test]
fn renders_every_frame_in_order() {
    let r = renderer(3);
    let tl = timeline(&r, 2.0);
    let mut sink = InMemorySink::new();
    let stats = r.render(&tl, None, &mut sink, &CancelToken::new()).unwrap();

    assert_eq!(stats.frames_total, 8);
    assert_eq!(stats.frames_rendered, 8);
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..8).collect::<Vec<_>>());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (18, 32));
    assert!(cfg.audio.is_none());
}

#[test]
fn chunk_size_does_not_change_output() {
    let a = renderer(1);
    let b = renderer(64);
    let tl = timeline(&a, 2.0);
    let mut sa = InMemorySink::new();
    let mut sb = InMemorySink::new();
    a.render(&tl, None, &mut sa, &CancelToken::new()).unwrap();
    b.render(&tl, None, &mut sb, &CancelToken::new()).unwrap();
    assert_eq!(sa.frames(), sb.frames());
}

#[test]
fn audio_is_handed_to_the_sink_and_cleaned_up() {
    let r = renderer(4);
    let tl = timeline(&r, 1.0);
    let audio = AudioTrack::silence(48_000, 2, 48_000);
    let mut sink = InMemorySink::new();
    r.render(&tl, Some(&audio), &mut sink, &CancelToken::new())
        .unwrap();

    let audio_cfg = sink.config().unwrap().audio.unwrap();
    assert_eq!(audio_cfg.sample_rate, 48_000);
    assert_eq!(audio_cfg.channels, 2);
    assert!(!audio_cfg.path.exists());
}

#[test]
fn cancellation_between_chunks_aborts_the_sink() {
    let r = renderer(2);
    let tl = timeline(&r, 2.0);
    let token = CancelToken::new();
    let mut sink = CancellingSink {
        inner: InMemorySink::new(),
        token: token.clone(),
        after: 2,
    };
    let err = r.render(&tl, None, &mut sink, &token).unwrap_err();
    assert!(matches!(err, ReelError::Cancelled));
    assert!(sink.inner.is_aborted());
    assert!(!sink.inner.is_finished());
    assert!(sink.inner.frames().is_empty());
}

#[test]
fn pre_cancelled_token_never_begins() {
    let r = renderer(2);
    let tl = timeline(&r, 1.0);
    let token = CancelToken::new();
    token.cancel();
    let mut sink = InMemorySink::new();
    assert!(matches!(
        r.render(&tl, None, &mut sink, &token),
        Err(ReelError::Cancelled)
    ));
    assert!(sink.config().is_none());
    assert!(sink.is_aborted());
}

#[test]
fn sink_errors_propagate() {
    let r = renderer(2);
    let tl = timeline(&r, 1.0);
    let err = r
        .render(&tl, None, &mut FailingSink, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}

#[test]
fn zero_threads_is_rejected() {
    assert!(
        Renderer::new(&RenderThreading {
            chunk_size: 1,
            threads: Some(0),
        })
        .is_err()
    );
}
