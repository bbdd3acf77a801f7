//! Media playback seam: the video source contract, the texture it feeds, and the seek rules the
//! walkman buttons apply to it.

use glam::UVec2;
use log::debug;

use crate::error::MediaError;
use crate::math::TextureMapping;

/// How much of the stream is buffered, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// A playable video whose frames can be sampled as a texture.
pub trait VideoSource {
    fn ready_state(&self) -> ReadyState;

    /// Frame data exists, so a texture sampled now shows a picture.
    fn has_frame_data(&self) -> bool {
        self.ready_state() >= ReadyState::HaveCurrentData
    }

    fn intrinsic_size(&self) -> Option<UVec2>;

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, secs: f64);

    /// Total length in seconds; not finite while unknown or for live streams.
    fn duration(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn set_volume(&mut self, volume: f32);

    /// The user pressed or touched the page. Sources that refuse unattended playback may now play.
    fn user_gesture(&mut self) {}
}

/// Jumps ahead by `step`, stopping at the end when the length is known.
pub fn seek_forward(video: &mut dyn VideoSource, step: f64) {
    let target = video.current_time() + step;
    let duration = video.duration();
    let target = if duration.is_finite() {
        target.min(duration)
    } else {
        target
    };
    video.set_current_time(target);
}

/// Jumps back by `step`, never before the start.
pub fn seek_backward(video: &mut dyn VideoSource, step: f64) {
    video.set_current_time((video.current_time() - step).max(0.0));
}

/// Delivery format implied by a media URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Adaptive HTTP live streaming playlist.
    Hls,
    Progressive,
}

impl SourceKind {
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".m3u8") {
            SourceKind::Hls
        } else {
            SourceKind::Progressive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// GPU-side view of the video frames.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTexture {
    pub size: UVec2,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub srgb: bool,
    pub mapping: TextureMapping,
}

impl VideoTexture {
    /// Full-frame texture: repeat (1, 1), offset (0, 0).
    pub fn new(size: UVec2) -> Self {
        Self {
            size,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            srgb: true,
            mapping: TextureMapping::IDENTITY,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.size.x as f32 / self.size.y as f32
    }

    /// Creates the texture once the source has a frame to show.
    pub fn from_source(video: &dyn VideoSource) -> Result<Self, MediaError> {
        if !video.has_frame_data() {
            return Err(MediaError::NotReady);
        }
        video.intrinsic_size().map(Self::new).ok_or(MediaError::NotReady)
    }
}

/// In-process video source driven by the caller's clock.
#[derive(Debug, Clone)]
pub struct MemoryVideo {
    url: String,
    size: UVec2,
    duration: f64,
    current_time: f64,
    ready_state: ReadyState,
    paused: bool,
    muted: bool,
    volume: f32,
    looping: bool,
    autoplay_blocked: bool,
}

impl MemoryVideo {
    pub fn new(url: impl Into<String>, size: UVec2, duration: f64) -> Self {
        Self {
            url: url.into(),
            size,
            duration,
            current_time: 0.0,
            ready_state: ReadyState::HaveNothing,
            paused: true,
            muted: true,
            volume: 1.0,
            looping: false,
            autoplay_blocked: false,
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Makes `play()` fail until [`MemoryVideo::grant_gesture`] is called.
    pub fn block_autoplay(mut self) -> Self {
        self.autoplay_blocked = true;
        self
    }

    pub fn grant_gesture(&mut self) {
        self.autoplay_blocked = false;
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        debug!("{} ready state {:?}", self.url, state);
        self.ready_state = state;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Advances playback by `delta_secs` of wall time.
    pub fn advance(&mut self, delta_secs: f64) {
        if self.paused || !self.has_frame_data() {
            return;
        }
        let next = self.current_time + delta_secs;
        if !self.duration.is_finite() || next < self.duration {
            self.current_time = next;
        } else if self.looping && self.duration > 0.0 {
            self.current_time = next.rem_euclid(self.duration);
        } else {
            self.current_time = self.duration;
            self.paused = true;
        }
    }
}

impl VideoSource for MemoryVideo {
    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn intrinsic_size(&self) -> Option<UVec2> {
        (self.ready_state >= ReadyState::HaveMetadata && self.size.x > 0 && self.size.y > 0)
            .then_some(self.size)
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, secs: f64) {
        self.current_time = secs;
    }

    fn duration(&self) -> f64 {
        if self.ready_state >= ReadyState::HaveMetadata {
            self.duration
        } else {
            f64::NAN
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.autoplay_blocked {
            return Err(MediaError::PlaybackBlocked);
        }
        if self.ready_state == ReadyState::HaveNothing {
            return Err(MediaError::NotReady);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn user_gesture(&mut self) {
        self.grant_gesture();
    }
}
