//! Animation over sliding windows of an index.
//!
//! [`save_animation`] renders one frame per window of the index with a caller
//! supplied plot function and streams the frames into a [`FrameWriter`].
//! Encoding the frames (GIF, MP4, ...) is the writer's business.

use std::fmt::Display;

use tracing::{debug, info};

use crate::image::Image;
use crate::{Error, Result};

/// Configuration for [`save_animation`].
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Window size of each frame (None = half the index length).
    pub delta: Option<usize>,
    /// Distance between the starts of consecutive windows.
    pub step: usize,
    /// Frames per second, passed to the writer.
    pub fps: u32,
    /// Log every frame at info level (otherwise debug).
    pub show_progress: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            delta: None,
            step: 1,
            fps: 3,
            show_progress: true,
        }
    }
}

/// Sink for rendered frames.
pub trait FrameWriter {
    /// Called once before the first frame.
    fn begin(&mut self, _fps: u32) -> Result<()> {
        Ok(())
    }

    /// Append one frame.
    fn append_frame(&mut self, frame: Image) -> Result<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A [`FrameWriter`] that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    fps: Option<u32>,
    frames: Vec<Image>,
    finished: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    pub fn frames(&self) -> &[Image] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Image> {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameWriter for FrameBuffer {
    fn begin(&mut self, fps: u32) -> Result<()> {
        self.fps = Some(fps);
        Ok(())
    }

    fn append_frame(&mut self, frame: Image) -> Result<()> {
        if self.finished {
            return Err(Error::Animation(
                "cannot append to a finished frame buffer".to_string(),
            ));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Render an animation over sliding windows of `index`.
///
/// Window starts run over `(0..index.len() - delta).step_by(step)`; for each
/// start `i` the plot function receives `&index[i..i + delta]` and the frame
/// it returns is appended to `writer`. A window wider than the index yields
/// no frames. The writer is finished after the last frame, and also when
/// plotting or appending fails; that error is returned unchanged.
///
/// # Arguments
/// * `index` - Labels to iterate over (e.g., dates)
/// * `plot` - Renders one window into a frame
/// * `writer` - Receives the frames
/// * `config` - Window size, step, frame rate and progress reporting
///
/// # Returns
/// Number of frames written.
pub fn save_animation<I, P, W>(
    index: &[I],
    mut plot: P,
    writer: &mut W,
    config: &AnimationConfig,
) -> Result<usize>
where
    I: Display,
    P: FnMut(&[I]) -> Result<Image>,
    W: FrameWriter + ?Sized,
{
    let delta = config.delta.unwrap_or(index.len() / 2);
    if delta == 0 && !index.is_empty() {
        return Err(Error::Animation(
            "window size must be positive".to_string(),
        ));
    }
    if config.step == 0 {
        return Err(Error::Animation("step must be positive".to_string()));
    }

    let starts: Vec<usize> = (0..index.len().saturating_sub(delta))
        .step_by(config.step)
        .collect();
    debug!(
        frames = starts.len(),
        delta,
        step = config.step,
        fps = config.fps,
        "saving animation"
    );

    writer.begin(config.fps)?;
    let rendered = render_frames(index, &starts, delta, &mut plot, writer, config);
    let finished = writer.finish();
    rendered?;
    finished?;

    Ok(starts.len())
}

fn render_frames<I, P, W>(
    index: &[I],
    starts: &[usize],
    delta: usize,
    plot: &mut P,
    writer: &mut W,
    config: &AnimationConfig,
) -> Result<()>
where
    I: Display,
    P: FnMut(&[I]) -> Result<Image>,
    W: FrameWriter + ?Sized,
{
    for (n, &i) in starts.iter().enumerate() {
        let window = &index[i..i + delta];
        let label = format!("{} - {}", window[0], window[delta - 1]);
        if config.show_progress {
            info!(frame = n + 1, total = starts.len(), window = %label, "rendering frame");
        } else {
            debug!(frame = n + 1, total = starts.len(), window = %label, "rendering frame");
        }

        let frame = plot(window)?;
        writer.append_frame(frame)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(value: u8) -> Image {
        Image::filled(1, 1, 1, value)
    }

    #[test]
    fn test_default_config() {
        let config = AnimationConfig::default();
        assert_eq!(config.delta, None);
        assert_eq!(config.step, 1);
        assert_eq!(config.fps, 3);
        assert!(config.show_progress);
    }

    #[test]
    fn test_windows_with_default_delta() {
        let index: Vec<u32> = (0..6).collect();
        let mut windows = Vec::new();
        let mut writer = FrameBuffer::new();

        let frames = save_animation(
            &index,
            |w: &[u32]| {
                windows.push(w.to_vec());
                Ok(solid(w[0] as u8))
            },
            &mut writer,
            &AnimationConfig::default(),
        )
        .unwrap();

        // delta = 3, starts 0..3
        assert_eq!(frames, 3);
        assert_eq!(windows, vec![vec![0, 1, 2], vec![1, 2, 3], vec![2, 3, 4]]);
        assert_eq!(writer.fps(), Some(3));
        assert!(writer.is_finished());
        assert_eq!(writer.frames()[2], solid(2));
    }

    #[test]
    fn test_step_and_explicit_delta() {
        let index: Vec<u32> = (0..10).collect();
        let mut starts = Vec::new();
        let mut writer = FrameBuffer::new();
        let config = AnimationConfig {
            delta: Some(2),
            step: 3,
            fps: 10,
            show_progress: false,
        };

        let frames = save_animation(
            &index,
            |w: &[u32]| {
                starts.push(w[0]);
                Ok(solid(0))
            },
            &mut writer,
            &config,
        )
        .unwrap();

        assert_eq!(frames, 3);
        assert_eq!(starts, vec![0, 3, 6]);
        assert_eq!(writer.fps(), Some(10));
    }

    #[test]
    fn test_invalid_parameters() {
        let index = [1, 2, 3];
        let mut writer = FrameBuffer::new();

        let zero_step = AnimationConfig {
            step: 0,
            ..AnimationConfig::default()
        };
        let result = save_animation(&index, |_: &[i32]| Ok(solid(0)), &mut writer, &zero_step);
        assert!(matches!(result, Err(Error::Animation(_))));

        let zero_delta = AnimationConfig {
            delta: Some(0),
            ..AnimationConfig::default()
        };
        let result = save_animation(&index, |_: &[i32]| Ok(solid(0)), &mut writer, &zero_delta);
        assert!(matches!(result, Err(Error::Animation(_))));

        assert!(writer.frames().is_empty());
        assert!(!writer.is_finished());
    }

    #[test]
    fn test_window_wider_than_index_yields_no_frames() {
        let index = [1, 2, 3];
        let mut writer = FrameBuffer::new();
        let config = AnimationConfig {
            delta: Some(4),
            ..AnimationConfig::default()
        };

        let frames = save_animation(&index, |_: &[i32]| Ok(solid(0)), &mut writer, &config).unwrap();

        assert_eq!(frames, 0);
        assert!(writer.frames().is_empty());
        assert!(writer.is_finished());
    }

    #[test]
    fn test_empty_index() {
        let index: [u32; 0] = [];
        let mut writer = FrameBuffer::new();

        let frames = save_animation(
            &index,
            |_: &[u32]| Ok(solid(0)),
            &mut writer,
            &AnimationConfig::default(),
        )
        .unwrap();

        assert_eq!(frames, 0);
        assert_eq!(writer.fps(), Some(3));
        assert!(writer.is_finished());
    }

    #[test]
    fn test_single_label_index() {
        // default delta is 0 for one label, which is rejected
        let index = [7u32];
        let mut writer = FrameBuffer::new();
        let result = save_animation(
            &index,
            |_: &[u32]| Ok(solid(0)),
            &mut writer,
            &AnimationConfig::default(),
        );
        assert!(matches!(result, Err(Error::Animation(_))));

        // a full-width window has no start before the end of the index
        let config = AnimationConfig {
            delta: Some(1),
            ..AnimationConfig::default()
        };
        let frames = save_animation(&index, |_: &[u32]| Ok(solid(0)), &mut writer, &config).unwrap();
        assert_eq!(frames, 0);
        assert!(writer.is_finished());
    }

    #[test]
    fn test_plot_error_stops_animation() {
        let index: Vec<u32> = (0..6).collect();
        let mut writer = FrameBuffer::new();

        let result = save_animation(
            &index,
            |w: &[u32]| {
                if w[0] == 1 {
                    Err(Error::Image("render failed".to_string()))
                } else {
                    Ok(solid(0))
                }
            },
            &mut writer,
            &AnimationConfig::default(),
        );

        assert!(matches!(result, Err(Error::Image(ref msg)) if msg == "render failed"));
        assert_eq!(writer.frames().len(), 1);
        assert!(writer.is_finished());
    }
}
