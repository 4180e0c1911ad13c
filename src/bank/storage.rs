//! Working storage for one simulation run.
//!
//! A batch holds `rounds * (players + 1)` hands and several arrays derived
//! from them, which can outgrow RAM for a few million rounds. Arrays are
//! either plain heap vectors or files mapped with `memmap2` inside a private
//! temporary directory. Both kinds deref to slices, so the pipeline does not
//! care which one it got. Everything is released when the [`Workspace`] and
//! its buffers are dropped.

use std::fs::OpenOptions;
use std::io;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;
use tempfile::TempDir;

use super::config::StorageConfig;
use crate::error::SimulationError;
use crate::poker::Card;

/// Plain-old-data element that can live in a mapped file.
///
/// # Safety
/// Implementors must be valid for every bit pattern, including all zeros,
/// and have no padding or pointers.
pub unsafe trait Element: Copy + Default + Send + Sync + 'static {}

unsafe impl Element for i32 {}
unsafe impl Element for u32 {}
unsafe impl Element for i64 {}
// Card is repr(transparent) over u32
unsafe impl Element for Card {}

/// A fixed-length array backed by a memory-mapped file.
pub struct MappedArray<T: Element> {
    mmap: MmapMut,
    len: usize,
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Element> MappedArray<T> {
    /// Create (or truncate) `path` and map `len` zeroed elements.
    pub fn create(path: &Path, len: usize) -> io::Result<Self> {
        let bytes = len
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "array size overflows usize"))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(bytes as u64)?;

        // Safety: the file was just created by us inside a private directory
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            mmap,
            len,
            path: path.to_path_buf(),
            _marker: PhantomData,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Element> Deref for MappedArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // Safety: the mapping is page aligned, sized for `len` elements, and
        // T accepts any bit pattern
        unsafe { std::slice::from_raw_parts(self.mmap.as_ptr() as *const T, self.len) }
    }
}

impl<T: Element> DerefMut for MappedArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.mmap.as_mut_ptr() as *mut T, self.len) }
    }
}

impl<T: Element> std::fmt::Debug for MappedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MappedArray({} x {}, {})", self.len, std::any::type_name::<T>(), self.path.display())
    }
}

/// A working array, on the heap or in a mapped file.
#[derive(Debug)]
pub enum Buffer<T: Element> {
    /// Plain heap allocation.
    Heap(Vec<T>),
    /// Backed by a file in the run's workspace.
    Mapped(MappedArray<T>),
}

impl<T: Element> Buffer<T> {
    /// Whether the buffer is file backed.
    pub fn is_mapped(&self) -> bool {
        matches!(self, Buffer::Mapped(_))
    }
}

impl<T: Element> Deref for Buffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            Buffer::Heap(v) => v.as_slice(),
            Buffer::Mapped(m) => &m[..],
        }
    }
}

impl<T: Element> DerefMut for Buffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Buffer::Heap(v) => v.as_mut_slice(),
            Buffer::Mapped(m) => &mut m[..],
        }
    }
}

/// Allocation scope for one run.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
}

impl Workspace {
    /// Heap-only workspace.
    pub fn in_memory() -> Self {
        Self { dir: None }
    }

    /// Workspace backed by a fresh temporary directory, created inside
    /// `parent` when given.
    pub fn mapped(parent: Option<&Path>) -> Result<Self, SimulationError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("tcp-bank-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|source| SimulationError::Storage {
            name: "workspace".to_string(),
            source,
        })?;

        log::debug!("working storage in {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    /// Pick a workspace for a batch of `hands` hands.
    pub fn for_batch(config: &StorageConfig, hands: usize) -> Result<Self, SimulationError> {
        if config.should_map(hands) {
            Self::mapped(config.data_dir.as_deref())
        } else {
            Ok(Self::in_memory())
        }
    }

    /// Whether arrays are file backed.
    pub fn is_mapped(&self) -> bool {
        self.dir.is_some()
    }

    /// Directory holding the mapped files, if any.
    pub fn path(&self) -> Option<&Path> {
        self.dir.as_ref().map(|d| d.path())
    }

    /// Allocate a zeroed array of `len` elements.
    pub fn allocate<T: Element>(&self, name: &str, len: usize) -> Result<Buffer<T>, SimulationError> {
        let storage_err = |source| SimulationError::Storage {
            name: name.to_string(),
            source,
        };

        match &self.dir {
            Some(dir) if len > 0 => {
                let path = dir.path().join(format!("{}.bin", name));
                MappedArray::create(&path, len).map(Buffer::Mapped).map_err(storage_err)
            }
            _ => {
                let mut v = Vec::new();
                v.try_reserve_exact(len)
                    .map_err(|e| storage_err(io::Error::new(io::ErrorKind::OutOfMemory, e)))?;
                v.resize(len, T::default());
                Ok(Buffer::Heap(v))
            }
        }
    }
}
