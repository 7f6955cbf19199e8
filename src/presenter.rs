// File: src/presenter.rs
//! Turns a duck URL into pixels for a fixed square viewport.
//!
//! URLs ending in `.gif` take the animated path: the downloaded bytes are
//! sniffed and handed to whichever animation decoder can read them (GIF or
//! animated WebP). Everything else, and anything no animation decoder
//! accepts, goes through the generic single-frame decoder. Both paths crop
//! to fill the viewport.

use crate::client::ImageSource;
use crate::model::ImageKind;

use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, ImageFormat, RgbaImage};
use log::{debug, warn};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// Shown when an animation frame claims a zero delay.
const FALLBACK_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Frames kept from one animation; the rest of the file is not decoded.
pub const MAX_ANIMATION_FRAMES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub side: u32,
}

impl Viewport {
    pub fn square(side: u32) -> Self {
        Self { side }
    }
}

/// One RGBA8 frame, already cropped to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
    pub delay: Duration,
}

impl Frame {
    fn from_rgba(img: RgbaImage, delay: Duration) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: Arc::new(img.into_raw()),
            delay,
        }
    }
}

/// Per-frame delays of an animation, without the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    delays: Vec<Duration>,
    total: Duration,
}

impl Timeline {
    fn new(delays: Vec<Duration>) -> Self {
        let total = delays.iter().sum();
        Self { delays, total }
    }

    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    pub fn loop_duration(&self) -> Duration {
        self.total
    }

    /// Index of the frame on screen `elapsed` after playback started, looping.
    pub fn index_at(&self, elapsed: Duration) -> usize {
        let total = self.total.as_nanos();
        if total == 0 {
            return 0;
        }
        let mut t = elapsed.as_nanos() % total;
        for (i, delay) in self.delays.iter().enumerate() {
            let d = delay.as_nanos();
            if t < d {
                return i;
            }
            t -= d;
        }
        self.delays.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<Frame>,
    timeline: Timeline,
}

impl Animation {
    fn new(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        let timeline = Timeline::new(frames.iter().map(|f| f.delay).collect());
        Some(Self { frames, timeline })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Hands the frames over, keeping only the timing.
    pub fn into_parts(self) -> (Vec<Frame>, Timeline) {
        (self.frames, self.timeline)
    }

    pub fn loop_duration(&self) -> Duration {
        self.timeline.loop_duration()
    }

    pub fn index_at(&self, elapsed: Duration) -> usize {
        self.timeline.index_at(elapsed)
    }

    pub fn frame_at(&self, elapsed: Duration) -> &Frame {
        &self.frames[self.index_at(elapsed)]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Presentation {
    /// Nothing to draw: no URL, empty URL, or the image failed to load.
    #[default]
    Placeholder,
    Still(Frame),
    Animation(Animation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Image(String),
    NoFrames,
    EmptyViewport,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Image(s) => write!(f, "could not decode image: {}", s),
            DecodeError::NoFrames => write!(f, "animation has no frames"),
            DecodeError::EmptyViewport => write!(f, "viewport has no area"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        DecodeError::Image(e.to_string())
    }
}

/// Takes the centred square of the source, then scales it to `side`.
/// Never allocates more than the source plus one `side * side` buffer.
pub fn crop_to_fill(img: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || side == 0 {
        return RgbaImage::new(side, side);
    }
    let square = w.min(h);
    let cropped = imageops::crop_imm(img, (w - square) / 2, (h - square) / 2, square, square);
    if square == side {
        return cropped.to_image();
    }
    imageops::resize(&*cropped, side, side, FilterType::Triangle)
}

pub fn decode(
    kind: ImageKind,
    bytes: &[u8],
    viewport: Viewport,
) -> Result<Presentation, DecodeError> {
    if viewport.side == 0 {
        return Err(DecodeError::EmptyViewport);
    }
    match kind {
        ImageKind::Animated => decode_animated(bytes, viewport),
        ImageKind::Static => decode_static(bytes, viewport),
    }
}

fn decode_static(bytes: &[u8], viewport: Viewport) -> Result<Presentation, DecodeError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Presentation::Still(Frame::from_rgba(
        crop_to_fill(&img, viewport.side),
        Duration::ZERO,
    )))
}

fn decode_animated(bytes: &[u8], viewport: Viewport) -> Result<Presentation, DecodeError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Gif) => {
            let decoder = GifDecoder::new(Cursor::new(bytes))?;
            collect_frames(decoder, viewport)
        }
        Ok(ImageFormat::WebP) => {
            let decoder = WebPDecoder::new(Cursor::new(bytes))?;
            if decoder.has_animation() {
                collect_frames(decoder, viewport)
            } else {
                decode_static(bytes, viewport)
            }
        }
        other => {
            debug!("No animation decoder for {:?}; decoding as a still", other);
            decode_static(bytes, viewport)
        }
    }
}

fn collect_frames<'a, D: AnimationDecoder<'a>>(
    decoder: D,
    viewport: Viewport,
) -> Result<Presentation, DecodeError> {
    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        if frames.len() == MAX_ANIMATION_FRAMES {
            warn!(
                "Animation longer than {} frames; playing only the first {}",
                MAX_ANIMATION_FRAMES, MAX_ANIMATION_FRAMES
            );
            break;
        }
        let frame = frame?;
        let mut delay = Duration::from(frame.delay());
        if delay.is_zero() {
            delay = FALLBACK_FRAME_DELAY;
        }
        frames.push(Frame::from_rgba(
            crop_to_fill(frame.buffer(), viewport.side),
            delay,
        ));
    }
    if frames.len() == 1 {
        let mut only = frames.remove(0);
        only.delay = Duration::ZERO;
        return Ok(Presentation::Still(only));
    }
    Animation::new(frames)
        .map(Presentation::Animation)
        .ok_or(DecodeError::NoFrames)
}

/// Downloads and decodes `url`. Any failure is logged and shown as a placeholder.
pub async fn present<S: ImageSource + ?Sized>(
    source: &S,
    url: &str,
    viewport: Viewport,
) -> Presentation {
    if url.is_empty() {
        return Presentation::Placeholder;
    }
    let bytes = match source.fetch_image(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not download {}: {}", url, e);
            return Presentation::Placeholder;
        }
    };
    let kind = ImageKind::of(url);
    match tokio::task::spawn_blocking(move || decode(kind, &bytes, viewport)).await {
        Ok(Ok(presentation)) => presentation,
        Ok(Err(e)) => {
            warn!("Could not show {}: {}", url, e);
            Presentation::Placeholder
        }
        Err(e) => {
            warn!("Decoder task for {} failed: {}", url, e);
            Presentation::Placeholder
        }
    }
}
