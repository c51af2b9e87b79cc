//! GPU buffer allocation seam.
//!
//! Meshes never talk to wgpu directly; they ask a [`GpuBackend`] for buffers
//! and keep whatever it returns. Releasing a buffer is tied to dropping it, so
//! a mesh frees exactly the buffers it created, once.
//!
//! Two backends ship with the crate:
//! - `wgpu::Device`, the real one
//! - [`HostBackend`], which keeps the bytes in host memory and counts
//!   allocations. Headless tools and the tests use it.

use std::{cell::Cell, rc::Rc};

use wgpu::util::DeviceExt;

/// What a buffer will be bound as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Index,
}

impl From<BufferUsage> for wgpu::BufferUsages {
    fn from(usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        }
    }
}

pub trait GpuBackend {
    /// Dropping a buffer must release it.
    type Buffer;

    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> Self::Buffer;
}

impl GpuBackend for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> wgpu::Buffer {
        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: usage.into(),
        })
    }
}

/// Allocation counters shared by a [`HostBackend`] and all of its buffers.
#[derive(Debug, Default)]
pub struct AllocationStats {
    created: Cell<usize>,
    released: Cell<usize>,
}

impl AllocationStats {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Buffers created and not dropped yet.
    pub fn live(&self) -> usize {
        self.created() - self.released()
    }
}

#[derive(Clone, Debug, Default)]
pub struct HostBackend {
    stats: Rc<AllocationStats>,
}

impl HostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }
}

#[derive(Debug)]
pub struct HostBuffer {
    label: String,
    usage: BufferUsage,
    contents: Vec<u8>,
    stats: Rc<AllocationStats>,
}

impl HostBuffer {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

impl Drop for HostBuffer {
    fn drop(&mut self) {
        self.stats.released.set(self.stats.released.get() + 1);
    }
}

impl GpuBackend for HostBackend {
    type Buffer = HostBuffer;

    fn create_buffer(&self, label: &str, contents: &[u8], usage: BufferUsage) -> HostBuffer {
        self.stats.created.set(self.stats.created.get() + 1);
        HostBuffer {
            label: label.to_string(),
            usage,
            contents: contents.to_vec(),
            stats: Rc::clone(&self.stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_buffers_are_counted_until_dropped() {
        let backend = HostBackend::new();
        let a = backend.create_buffer("a", &[1, 2, 3], BufferUsage::Vertex);
        let b = backend.create_buffer("b", &[4], BufferUsage::Index);
        assert_eq!(backend.stats().created(), 2);
        assert_eq!(backend.stats().live(), 2);
        assert_eq!(a.contents(), &[1, 2, 3]);
        assert_eq!(b.usage(), BufferUsage::Index);

        drop(a);
        assert_eq!(backend.stats().live(), 1);
        drop(b);
        assert_eq!(backend.stats().live(), 0);
        assert_eq!(backend.stats().released(), 2);
    }

    #[test]
    fn usage_maps_to_wgpu() {
        assert_eq!(wgpu::BufferUsages::from(BufferUsage::Vertex), wgpu::BufferUsages::VERTEX);
        assert_eq!(wgpu::BufferUsages::from(BufferUsage::Index), wgpu::BufferUsages::INDEX);
    }
}
