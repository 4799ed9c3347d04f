//! Single-slot, last-write-wins frame exchange between a producer and the
//! render loop.
//!
//! The buffer holds exactly one cloud. Publishing replaces it and raises the
//! dirty flag; the render side converts it under the same lock and lowers
//! the flag only once conversion succeeded. The cloud and the flag live
//! behind one mutex so a reader can never pair a dirty flag with a cloud
//! from a different publish.

use cloudstream_core::{ColoredPointCloud3f, Result};
use log::trace;
use parking_lot::Mutex;

#[derive(Debug)]
struct FrameState {
    current: ColoredPointCloud3f,
    dirty: bool,
    generation: u64,
}

/// Mutex-guarded holder of the most recent published frame
#[derive(Debug)]
pub struct FrameBuffer {
    state: Mutex<FrameState>,
}

impl FrameBuffer {
    /// Create an empty buffer
    ///
    /// Starts dirty so the first draw cycle performs one (possibly empty)
    /// conversion.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FrameState {
                current: ColoredPointCloud3f::new(),
                dirty: true,
                generation: 0,
            }),
        }
    }

    /// Replace the current frame with a deep copy of `cloud`
    ///
    /// The copy is made before taking the lock; if it fails nothing is
    /// modified and the allocation error is returned.
    pub fn publish(&self, cloud: &ColoredPointCloud3f) -> Result<()> {
        let copy = cloud.try_clone()?;
        self.publish_owned(copy);
        Ok(())
    }

    /// Replace the current frame, taking ownership of `cloud`
    pub fn publish_owned(&self, cloud: ColoredPointCloud3f) {
        let previous = {
            let mut state = self.state.lock();
            state.dirty = true;
            state.generation += 1;
            trace!("Published frame {} ({} points)", state.generation, cloud.len());
            std::mem::replace(&mut state.current, cloud)
        };
        // Superseded frame is freed outside the lock
        drop(previous);
    }

    /// Whether a frame is waiting to be converted
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Number of publishes so far
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Number of points in the current frame
    pub fn len(&self) -> usize {
        self.state.lock().current.len()
    }

    /// Whether the current frame has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Force the next draw cycle to reconvert the current frame
    pub fn mark_dirty(&self) {
        self.state.lock().dirty = true;
    }

    /// Run `f` on the current frame if it is dirty
    ///
    /// Returns `Ok(None)` without calling `f` when the frame is clean. The
    /// dirty flag is cleared, still under the lock, only when `f` returns
    /// `Ok`; on error the frame stays dirty so the next cycle retries.
    pub fn with_current_if_dirty<R, F>(&self, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&ColoredPointCloud3f) -> Result<R>,
    {
        let mut state = self.state.lock();
        if !state.dirty {
            return Ok(None);
        }
        let result = f(&state.current)?;
        state.dirty = false;
        Ok(Some(result))
    }

    /// Run `f` on the current frame regardless of the dirty flag
    ///
    /// Clears the flag on success, like [`with_current_if_dirty`](Self::with_current_if_dirty).
    pub fn with_current<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&ColoredPointCloud3f) -> Result<R>,
    {
        let mut state = self.state.lock();
        let result = f(&state.current)?;
        state.dirty = false;
        Ok(result)
    }

    /// Copy the current frame out if it is dirty, clearing the flag
    pub fn take_if_dirty(&self) -> Result<Option<ColoredPointCloud3f>> {
        self.with_current_if_dirty(|cloud| cloud.try_clone())
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudstream_core::{ColoredPoint3f, Error};

    fn cloud_of(n: usize) -> ColoredPointCloud3f {
        (0..n)
            .map(|i| ColoredPoint3f::new(i as f32, 0.0, 0.0, [0, 0, 0, 255]))
            .collect()
    }

    #[test]
    fn test_starts_dirty_and_empty() {
        let frames = FrameBuffer::new();
        assert!(frames.is_dirty());
        assert!(frames.is_empty());
        assert_eq!(frames.generation(), 0);
    }

    #[test]
    fn test_clean_buffer_skips_callback() {
        let frames = FrameBuffer::new();
        assert_eq!(frames.with_current_if_dirty(|c| Ok(c.len())).unwrap(), Some(0));

        let mut called = false;
        let result = frames
            .with_current_if_dirty(|_| {
                called = true;
                Ok(())
            })
            .unwrap();
        assert!(result.is_none());
        assert!(!called);
    }

    #[test]
    fn test_failed_conversion_keeps_frame_dirty() {
        let frames = FrameBuffer::new();
        frames.publish(&cloud_of(4)).unwrap();

        let result: Result<Option<()>> =
            frames.with_current_if_dirty(|_| Err(Error::Visualization("sink gone".to_string())));
        assert!(result.is_err());
        assert!(frames.is_dirty());

        assert_eq!(frames.with_current_if_dirty(|c| Ok(c.len())).unwrap(), Some(4));
        assert!(!frames.is_dirty());
    }

    #[test]
    fn test_publish_copies_input() {
        let frames = FrameBuffer::new();
        let mut cloud = cloud_of(2);
        frames.publish(&cloud).unwrap();
        cloud.push(ColoredPoint3f::default());

        assert_eq!(frames.len(), 2);
        assert_eq!(frames.generation(), 1);
    }

    #[test]
    fn test_take_if_dirty() {
        let frames = FrameBuffer::new();
        frames.publish_owned(cloud_of(3));

        let taken = frames.take_if_dirty().unwrap().unwrap();
        assert_eq!(taken.len(), 3);
        assert!(frames.take_if_dirty().unwrap().is_none());

        frames.mark_dirty();
        assert_eq!(frames.take_if_dirty().unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_with_current_ignores_flag() {
        let frames = FrameBuffer::new();
        frames.take_if_dirty().unwrap();
        assert!(!frames.is_dirty());
        assert_eq!(frames.with_current(|c| Ok(c.len())).unwrap(), 0);
    }
}
