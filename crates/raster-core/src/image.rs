//! The copy-on-write pixel buffer.
//!
//! An [`Image`] is interleaved row-major component data plus the metadata
//! needed to interpret it: dimensions, channel count, [`ColorSpace`] and
//! [`AlphaMode`]. The data block lives behind an [`Arc`], so clones are
//! cheap; the first mutation through a shared image deep-copies the block
//! ([`Arc::make_mut`]) and later mutations through a unique image write in
//! place. This holds for borrowed storage too: a unique image over borrowed
//! memory mutates the caller's buffer directly.
//!
//! Zero-sized images do not exist: constructors panic on zero width, height
//! or channel count. Out-of-range pixel access is a programmer error and
//! panics; fallible variants are provided where lookup failure is a normal
//! outcome.

use std::ptr::NonNull;
use std::sync::Arc;

use crate::alloc::{AllocatorTag, Storage, StorageAllocator};
use crate::alpha::{infer_alpha_mode, AlphaMode};
use crate::colorspace::ColorSpace;
use crate::component::Component;
use crate::error::{Error, Result};

/// A 2D interleaved pixel buffer with copy-on-write storage.
///
/// # Example
///
/// ```rust
/// use raster_core::{AlphaMode, ColorSpace, Image};
///
/// let mut img = Image::<f32>::new(4, 4, 3, ColorSpace::LinearSrgb, AlphaMode::None);
/// img.set_pixel_channel(1, 2, 0, 0.5);
/// assert_eq!(img.pixel_channel(1, 2, 0), 0.5);
///
/// let clone = img.clone();
/// img.set_pixel_channel(0, 0, 0, 1.0); // copy-on-write: clone is untouched
/// assert_eq!(clone.pixel_channel(0, 0, 0), 0.0);
/// ```
pub struct Image<T: Component> {
    storage: Arc<Storage<T>>,
    width: u32,
    height: u32,
    channels: u32,
    color_space: ColorSpace,
    alpha_mode: AlphaMode,
}

impl<T: Component> Image<T> {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a zero-filled image.
    ///
    /// # Panics
    ///
    /// Panics if any of `width`, `height` or `channels` is zero, or if
    /// `alpha_mode` is [`AlphaMode::Inferred`] (there is no data to infer
    /// from; zero-filled data is trivially premultiplied, ask for that).
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        color_space: ColorSpace,
        alpha_mode: AlphaMode,
    ) -> Self {
        check_dimensions(width, height, channels);
        assert!(
            alpha_mode.is_concrete(),
            "a zero-filled image has no data to infer an alpha mode from"
        );
        let storage = Storage::allocate(element_count(width, height, channels), true);
        Self {
            storage: Arc::new(storage),
            width,
            height,
            channels,
            color_space,
            alpha_mode,
        }
    }

    /// Creates an image over uninitialized storage.
    ///
    /// # Safety
    ///
    /// Every component must be written before it is read. The image behaves
    /// like any other once fully initialized.
    pub unsafe fn new_uninitialized(
        width: u32,
        height: u32,
        channels: u32,
        color_space: ColorSpace,
        alpha_mode: AlphaMode,
    ) -> Self {
        check_dimensions(width, height, channels);
        assert!(
            alpha_mode.is_concrete(),
            "an uninitialized image has no data to infer an alpha mode from"
        );
        let storage = Storage::allocate(element_count(width, height, channels), false);
        Self {
            storage: Arc::new(storage),
            width,
            height,
            channels,
            color_space,
            alpha_mode,
        }
    }

    /// Creates a zero-filled image whose block comes from a caller-supplied
    /// allocator. The allocator's `release` runs when the last clone drops.
    pub fn with_allocator(
        width: u32,
        height: u32,
        channels: u32,
        color_space: ColorSpace,
        alpha_mode: AlphaMode,
        allocator: Arc<dyn StorageAllocator>,
    ) -> Self {
        check_dimensions(width, height, channels);
        assert!(
            alpha_mode.is_concrete(),
            "a zero-filled image has no data to infer an alpha mode from"
        );
        let storage =
            Storage::allocate_custom(element_count(width, height, channels), true, allocator);
        Self {
            storage: Arc::new(storage),
            width,
            height,
            channels,
            color_space,
            alpha_mode,
        }
    }

    /// Adopts a `Vec`'s allocation as image storage without copying.
    ///
    /// The vector length must equal `width * height * channels`. An
    /// [`AlphaMode::Inferred`] request is resolved against the data here.
    pub fn from_vec(
        data: Vec<T>,
        width: u32,
        height: u32,
        channels: u32,
        color_space: ColorSpace,
        alpha_mode: AlphaMode,
    ) -> Result<Self> {
        check_dimensions(width, height, channels);
        let expected = element_count(width, height, channels);
        if data.len() != expected {
            return Err(Error::buffer_length_mismatch(expected, data.len()));
        }
        let alpha_mode = resolve_alpha_mode(alpha_mode, &data, channels, color_space);
        Ok(Self {
            storage: Arc::new(Storage::from_vec(data)),
            width,
            height,
            channels,
            color_space,
            alpha_mode,
        })
    }

    /// Adopts an externally supplied block as image storage without copying.
    ///
    /// The [`AllocatorTag`] decides ownership; [`AllocatorTag::Borrowed`]
    /// blocks are never released. An [`AlphaMode::Inferred`] request is
    /// resolved against the data.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of
    /// `width * height * channels` components for the image's lifetime
    /// (including clones), and must satisfy the tag's release contract.
    pub unsafe fn from_raw_parts(
        ptr: NonNull<T>,
        width: u32,
        height: u32,
        channels: u32,
        tag: AllocatorTag,
        color_space: ColorSpace,
        alpha_mode: AlphaMode,
    ) -> Self {
        check_dimensions(width, height, channels);
        let count = element_count(width, height, channels);
        let storage = unsafe { Storage::from_raw_parts(ptr, count, tag) };
        let alpha_mode =
            resolve_alpha_mode(alpha_mode, storage.as_slice(), channels, color_space);
        Self {
            storage: Arc::new(storage),
            width,
            height,
            channels,
            color_space,
            alpha_mode,
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channel count.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// The color space the data is encoded in.
    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// How color channels relate to alpha. Always concrete.
    #[inline]
    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Total component count (`width * height * channels`).
    #[inline]
    pub fn element_count(&self) -> usize {
        element_count(self.width, self.height, self.channels)
    }

    /// Whether the image has an alpha channel in a concrete related mode.
    #[inline]
    pub fn has_related_alpha(&self) -> bool {
        self.channels >= 2 && self.alpha_mode != AlphaMode::None
    }

    /// Retags the color space without touching pixel data.
    ///
    /// This is reinterpretation, not conversion; see
    /// [`Image::convert_color_space`] for the converting form.
    #[inline]
    pub fn reinterpret_color_space(&mut self, color_space: ColorSpace) {
        self.color_space = color_space;
    }

    /// Retags the alpha mode without touching pixel data.
    ///
    /// # Panics
    ///
    /// Panics on [`AlphaMode::Inferred`]; inference is a construction-time
    /// request, use [`infer_alpha_mode`] explicitly if needed.
    #[inline]
    pub fn reinterpret_alpha_mode(&mut self, alpha_mode: AlphaMode) {
        assert!(
            alpha_mode.is_concrete(),
            "reinterpretation requires a concrete alpha mode"
        );
        self.alpha_mode = alpha_mode;
    }

    /// The storage tag of the current data block.
    #[inline]
    pub fn storage_tag(&self) -> &AllocatorTag {
        self.storage.tag()
    }

    /// Whether this image currently shares its data block with a clone.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.storage) > 1
    }

    // ========================================================================
    // Data access
    // ========================================================================

    /// The pixel data as an interleaved row-major slice.
    ///
    /// Excludes any storage padding beyond the logical element count.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.storage.as_slice()[..self.element_count()]
    }

    /// Mutable pixel data. Triggers copy-on-write if the block is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        let count = self.element_count();
        &mut Arc::make_mut(&mut self.storage).as_mut_slice()[..count]
    }

    /// The logical pixel data as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.as_bytes()[..self.element_count() * size_of::<T>()]
    }

    #[inline]
    fn component_index(&self, x: u32, y: u32, channel: u32) -> usize {
        assert!(
            x < self.width && y < self.height && channel < self.channels,
            "pixel access out of range: ({x}, {y}) channel {channel} in {}x{}x{}",
            self.width,
            self.height,
            self.channels
        );
        ((y as usize * self.width as usize + x as usize) * self.channels as usize)
            + channel as usize
    }

    /// One component of one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y` or `channel` is out of range.
    #[inline]
    pub fn pixel_channel(&self, x: u32, y: u32, channel: u32) -> T {
        self.data()[self.component_index(x, y, channel)]
    }

    /// Writes one component of one pixel. Triggers copy-on-write.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y` or `channel` is out of range.
    #[inline]
    pub fn set_pixel_channel(&mut self, x: u32, y: u32, channel: u32, value: T) {
        let index = self.component_index(x, y, channel);
        self.data_mut()[index] = value;
    }

    /// One component of one pixel, or `None` if out of range.
    #[inline]
    pub fn try_pixel_channel(&self, x: u32, y: u32, channel: u32) -> Option<T> {
        if x < self.width && y < self.height && channel < self.channels {
            Some(self.pixel_channel(x, y, channel))
        } else {
            None
        }
    }

    /// Writes one component of one pixel if in range. Returns whether the
    /// write happened. Triggers copy-on-write on success.
    #[inline]
    pub fn try_set_pixel_channel(&mut self, x: u32, y: u32, channel: u32, value: T) -> bool {
        if x < self.width && y < self.height && channel < self.channels {
            self.set_pixel_channel(x, y, channel, value);
            true
        } else {
            false
        }
    }

    /// All channels of one pixel as a slice.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        let start = self.component_index(x, y, 0);
        &self.data()[start..start + self.channels as usize]
    }

    /// All channels of one pixel, mutably. Triggers copy-on-write.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        let start = self.component_index(x, y, 0);
        let channels = self.channels as usize;
        &mut self.data_mut()[start..start + channels]
    }

    /// One row of interleaved components.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        let stride = self.width as usize * self.channels as usize;
        let start = y as usize * stride;
        &self.data()[start..start + stride]
    }

    // ========================================================================
    // Whole-image transforms
    // ========================================================================

    /// Applies a function to every component in place.
    pub fn apply(&mut self, f: impl Fn(T) -> T) {
        for v in self.data_mut() {
            *v = f(*v);
        }
    }

    /// Applies a function to the given channels of every pixel in place.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the channel count.
    pub fn apply_channels(&mut self, channels: std::ops::Range<u32>, f: impl Fn(T) -> T) {
        assert!(
            channels.end <= self.channels,
            "channel range {channels:?} exceeds {} channels",
            self.channels
        );
        let stride = self.channels as usize;
        let range = channels.start as usize..channels.end as usize;
        for pixel in self.data_mut().chunks_exact_mut(stride) {
            for v in &mut pixel[range.clone()] {
                *v = f(*v);
            }
        }
    }

    /// Produces a new image by mapping every component, preserving metadata.
    pub fn map<U: Component>(&self, f: impl Fn(T) -> U) -> Image<U> {
        // Fully overwritten below.
        let mut out = unsafe {
            Image::<U>::new_uninitialized(
                self.width,
                self.height,
                self.channels,
                self.color_space,
                self.alpha_mode,
            )
        };
        for (dst, &src) in out.data_mut().iter_mut().zip(self.data()) {
            *dst = f(src);
        }
        out
    }

    /// Converts the component format through normalized `f32`.
    ///
    /// Fixed-point encodings follow the exact unorm/snorm rules of
    /// [`Component`]; metadata is preserved.
    pub fn convert_format<U: Component>(&self) -> Image<U> {
        self.map(|v| U::from_f32(v.to_f32()))
    }

    /// Extracts a rectangular region as a new image.
    ///
    /// With `clamp_out_of_bounds`, source coordinates outside the image are
    /// clamped to the nearest edge pixel (edge replication), so any window
    /// position is valid. Without it, the window must lie fully inside.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero, or if the window is out of
    /// bounds and `clamp_out_of_bounds` is `false`.
    pub fn cropped(
        &self,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        clamp_out_of_bounds: bool,
    ) -> Image<T> {
        if !clamp_out_of_bounds {
            assert!(
                x >= 0
                    && y >= 0
                    && x + width as i64 <= self.width as i64
                    && y + height as i64 <= self.height as i64,
                "crop window ({x}, {y}) {width}x{height} exceeds {}x{}",
                self.width,
                self.height
            );
        }
        let mut out = unsafe {
            Image::<T>::new_uninitialized(
                width,
                height,
                self.channels,
                self.color_space,
                self.alpha_mode,
            )
        };
        let channels = self.channels as usize;
        for dy in 0..height {
            let sy = (y + dy as i64).clamp(0, self.height as i64 - 1) as u32;
            for dx in 0..width {
                let sx = (x + dx as i64).clamp(0, self.width as i64 - 1) as u32;
                out.pixel_mut(dx, dy)[..channels].copy_from_slice(self.pixel(sx, sy));
            }
        }
        out
    }

    /// Swaps the x and y axes.
    pub fn transposed(&self) -> Image<T> {
        let mut out = unsafe {
            Image::<T>::new_uninitialized(
                self.height,
                self.width,
                self.channels,
                self.color_space,
                self.alpha_mode,
            )
        };
        let channels = self.channels as usize;
        for y in 0..self.height {
            for x in 0..self.width {
                out.pixel_mut(y, x)[..channels].copy_from_slice(self.pixel(x, y));
            }
        }
        out
    }
}

impl<T: Component> Clone for Image<T> {
    /// Cheap clone: the data block is shared until either side mutates.
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            width: self.width,
            height: self.height,
            channels: self.channels,
            color_space: self.color_space,
            alpha_mode: self.alpha_mode,
        }
    }
}

impl<T: Component> PartialEq for Image<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.width != other.width
            || self.height != other.height
            || self.channels != other.channels
            || self.color_space != other.color_space
            || self.alpha_mode != other.alpha_mode
        {
            return false;
        }
        Arc::ptr_eq(&self.storage, &other.storage) || self.as_bytes() == other.as_bytes()
    }
}

impl<T: Component> std::hash::Hash for Image<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.width.hash(state);
        self.height.hash(state);
        self.channels.hash(state);
        self.color_space.hash(state);
        self.alpha_mode.hash(state);
        self.as_bytes().hash(state);
    }
}

impl<T: Component> std::fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("color_space", &self.color_space)
            .field("alpha_mode", &self.alpha_mode)
            .field("storage", &*self.storage)
            .finish()
    }
}

#[inline]
fn element_count(width: u32, height: u32, channels: u32) -> usize {
    width as usize * height as usize * channels as usize
}

#[inline]
fn check_dimensions(width: u32, height: u32, channels: u32) {
    assert!(
        width > 0 && height > 0 && channels > 0,
        "image dimensions must be nonzero, got {width}x{height} with {channels} channels"
    );
}

fn resolve_alpha_mode<T: Component>(
    requested: AlphaMode,
    data: &[T],
    channels: u32,
    color_space: ColorSpace,
) -> AlphaMode {
    match requested {
        AlphaMode::Inferred => infer_alpha_mode(data, channels, color_space),
        concrete => concrete,
    }
}
