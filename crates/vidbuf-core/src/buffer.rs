//! Reference-counted buffer backings.
//!
//! A [`BufferRef`] is one handle to a shared byte block. Cloning the handle
//! adds a reference; the block is freed (or handed to its release callback)
//! when the last handle is dropped, on whatever thread that happens.

use crate::error::{FrameError, Result};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Callback receiving adopted memory back once the last reference is gone.
pub type ReleaseFn = Box<dyn FnOnce(Box<[u8]>) + Send>;

/// Opaque hardware context, reference-counted independently of frames.
pub type HwContextRef = Arc<dyn Any + Send + Sync>;

struct Backing {
    data: Box<[u8]>,
    read_only: bool,
    // Only taken in Drop; the mutex makes a Send-only closure shareable.
    release: Mutex<Option<ReleaseFn>>,
}

impl Drop for Backing {
    fn drop(&mut self) {
        if let Some(release) = self.release.get_mut().take() {
            trace!("releasing adopted buffer of {} bytes", self.data.len());
            release(std::mem::take(&mut self.data));
        }
    }
}

/// Shared handle to a byte block.
#[derive(Clone)]
pub struct BufferRef(Arc<Backing>);

impl BufferRef {
    /// Allocate a zeroed block of `size` bytes.
    pub fn alloc(size: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|e| {
            FrameError::AllocationFailure(format!("cannot allocate {} bytes: {}", size, e))
        })?;
        data.resize(size, 0);
        Ok(Self(Arc::new(Backing {
            data: data.into_boxed_slice(),
            read_only: false,
            release: Mutex::new(None),
        })))
    }

    /// Adopt caller memory without copying. `release` gets the memory back
    /// exactly once, from the thread that drops the last reference.
    pub fn from_boxed<F>(data: Box<[u8]>, release: F) -> Self
    where
        F: FnOnce(Box<[u8]>) + Send + 'static,
    {
        Self(Arc::new(Backing {
            data,
            read_only: false,
            release: Mutex::new(Some(Box::new(release))),
        }))
    }

    /// Zero-length read-only marker whose release callback does the real
    /// cleanup, e.g. returning a hardware surface to its pool.
    pub fn custom<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Arc::new(Backing {
            data: Box::default(),
            read_only: true,
            release: Mutex::new(Some(Box::new(move |_| release()))),
        }))
    }

    /// Size of the block in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.data.is_empty()
    }

    /// Read access to the whole block.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.0.data
    }

    /// Write access, only while this is the sole reference.
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        if self.0.read_only {
            return None;
        }
        Arc::get_mut(&mut self.0).map(|b| &mut b.data[..])
    }

    /// Number of live references.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// True iff this handle is the only reference and no borrowed view
    /// pins the block.
    pub fn is_writable(&self) -> bool {
        !self.0.read_only && Arc::strong_count(&self.0) == 1 && Arc::weak_count(&self.0) == 0
    }

    /// Start address of the block, used for alignment computations.
    #[inline]
    pub fn addr(&self) -> usize {
        self.0.data.as_ptr() as usize
    }

    /// Whether two handles refer to the same block.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Non-owning handle for borrowed views.
    pub fn downgrade(&self) -> WeakBufferRef {
        WeakBufferRef(Arc::downgrade(&self.0))
    }
}

impl fmt::Debug for BufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferRef")
            .field("len", &self.len())
            .field("refs", &self.ref_count())
            .field("read_only", &self.0.read_only)
            .finish()
    }
}

/// Non-owning handle to a buffer backing.
#[derive(Clone)]
pub struct WeakBufferRef(Weak<Backing>);

impl WeakBufferRef {
    /// A temporary reference, or `None` once the backing is gone.
    pub fn upgrade(&self) -> Option<BufferRef> {
        self.0.upgrade().map(BufferRef)
    }
}

impl fmt::Debug for WeakBufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakBufferRef(alive: {})", self.0.strong_count() > 0)
    }
}
