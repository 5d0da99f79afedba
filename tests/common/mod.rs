//! Recording device shared by the integration tests.
//!
//! `MockDevice` implements the GPU seam without an adapter. Every allocation,
//! write, destruction and pass command lands in one journal, so tests can
//! assert on draw order, buffer contents and teardown order. Binding or
//! writing a destroyed buffer is recorded as a violation instead of
//! panicking.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use arbor::errors::{Result, SceneError};
use arbor::gpu::{BufferInit, BufferKind, DrawPass, GpuBuffer, GpuDevice};
use arbor::{Camera, CameraBinding, MaterialBinding, Tracked};
use glam::Mat4;
use parking_lot::Mutex;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Journal
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateBuffer {
        id: u64,
        label: Option<String>,
        kind: BufferKind,
        size: u64,
    },
    WriteBuffer {
        id: u64,
    },
    DestroyBuffer {
        id: u64,
    },
    CreateBindGroup {
        id: u64,
        buffer: Option<u64>,
    },
    ReleaseBindGroup {
        id: u64,
    },
    SetVertexBuffer {
        slot: u32,
        buffer: u64,
    },
    SetIndexBuffer {
        buffer: u64,
    },
    SetBindGroup {
        index: u32,
        bind_group: u64,
        buffer: Option<u64>,
    },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
    },
}

#[derive(Debug, Default)]
struct BufferRecord {
    contents: Vec<u8>,
    destroyed: bool,
    /// Handle dropped; the device reclaims the memory like `wgpu` does.
    dropped: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    buffers: HashMap<u64, BufferRecord>,
    events: Vec<Event>,
    violations: Vec<String>,
    buffers_created: usize,
    fail_after: Option<usize>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_live(&mut self, id: u64, what: &str) {
        if self.buffers.get(&id).is_none_or(|b| b.destroyed) {
            self.violations.push(format!("{what} on destroyed buffer #{id}"));
        }
    }
}

// ============================================================================
// Handles
// ============================================================================

pub struct MockBuffer {
    id: u64,
    size: u64,
    state: Arc<Mutex<State>>,
}

impl MockBuffer {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl GpuBuffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn destroy(&self) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let id = self.id;
        match state.buffers.get_mut(&id) {
            Some(record) if !record.destroyed => record.destroyed = true,
            _ => state.violations.push(format!("double destroy of buffer #{id}")),
        }
        state.events.push(Event::DestroyBuffer { id });
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        if let Some(record) = self.state.lock().buffers.get_mut(&self.id) {
            record.dropped = true;
        }
    }
}

pub struct MockBindGroup {
    id: u64,
    buffer: Option<u64>,
    state: Arc<Mutex<State>>,
}

impl MockBindGroup {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The uniform buffer this group references, if any.
    pub fn buffer(&self) -> Option<u64> {
        self.buffer
    }
}

impl Drop for MockBindGroup {
    fn drop(&mut self) {
        self.state.lock().events.push(Event::ReleaseBindGroup { id: self.id });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLayout(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockView(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSampler;

// ============================================================================
// Device
// ============================================================================

#[derive(Clone, Default)]
pub struct MockDevice {
    state: Arc<Mutex<State>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device that refuses every buffer allocation after the first `n`.
    pub fn failing_after(n: usize) -> Self {
        let device = Self::default();
        device.state.lock().fail_after = Some(n);
        device
    }

    pub fn pass(&self) -> MockPass {
        MockPass {
            state: Arc::clone(&self.state),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    pub fn violations(&self) -> Vec<String> {
        self.state.lock().violations.clone()
    }

    pub fn buffers_created(&self) -> usize {
        self.state.lock().buffers_created
    }

    /// Buffers neither destroyed nor dropped.
    pub fn live_buffers(&self) -> usize {
        self.state.lock().buffers.values().filter(|b| !b.destroyed && !b.dropped).count()
    }

    pub fn is_destroyed(&self, id: u64) -> bool {
        self.state.lock().buffers.get(&id).is_some_and(|b| b.destroyed)
    }

    pub fn contents(&self, id: u64) -> Vec<u8> {
        self.state.lock().buffers.get(&id).map(|b| b.contents.clone()).unwrap_or_default()
    }

    /// Reads a buffer holding one column-major `mat4x4<f32>`.
    pub fn read_mat4(&self, id: u64) -> Mat4 {
        let bytes = self.contents(id);
        let cols: [f32; 16] = bytemuck::pod_read_unaligned(&bytes[..64]);
        Mat4::from_cols_array(&cols)
    }

    /// `(index_count, instance_count)` of every draw, in submission order.
    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DrawIndexed {
                    index_count,
                    instance_count,
                } => Some((index_count, instance_count)),
                _ => None,
            })
            .collect()
    }

    /// Ids of destroyed buffers, in destruction order.
    pub fn destroyed_order(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::DestroyBuffer { id } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn bind_group(&self, buffer: Option<u64>) -> MockBindGroup {
        let mut state = self.state.lock();
        let id = state.next_id();
        if let Some(buffer) = buffer {
            state.check_live(buffer, "bind group creation");
        }
        state.events.push(Event::CreateBindGroup { id, buffer });
        MockBindGroup {
            id,
            buffer,
            state: Arc::clone(&self.state),
        }
    }
}

impl GpuDevice for MockDevice {
    type Buffer = MockBuffer;
    type BindGroup = MockBindGroup;
    type BindGroupLayout = MockLayout;
    type TextureView = MockView;
    type Sampler = MockSampler;

    fn create_buffer_init(&self, desc: &BufferInit<'_>) -> Result<MockBuffer> {
        let mut state = self.state.lock();
        if state.fail_after.is_some_and(|n| state.buffers_created >= n) {
            return Err(SceneError::Allocation {
                label: desc.label.unwrap_or("unlabeled").to_string(),
                reason: "out of device memory".to_string(),
            });
        }

        let id = state.next_id();
        state.buffers_created += 1;
        state.buffers.insert(
            id,
            BufferRecord {
                contents: desc.contents.to_vec(),
                destroyed: false,
                dropped: false,
            },
        );
        state.events.push(Event::CreateBuffer {
            id,
            label: desc.label.map(str::to_string),
            kind: desc.kind,
            size: desc.contents.len() as u64,
        });

        Ok(MockBuffer {
            id,
            size: desc.contents.len() as u64,
            state: Arc::clone(&self.state),
        })
    }

    fn create_uniform_bind_group(
        &self,
        _label: Option<&str>,
        _layout: &MockLayout,
        buffer: &MockBuffer,
    ) -> Result<MockBindGroup> {
        Ok(self.bind_group(Some(buffer.id)))
    }

    fn create_texture_bind_group(
        &self,
        _label: Option<&str>,
        _layout: &MockLayout,
        _view: &MockView,
        _sampler: &MockSampler,
    ) -> Result<MockBindGroup> {
        Ok(self.bind_group(None))
    }

    fn write_buffer(&self, buffer: &MockBuffer, offset: u64, data: &[u8]) {
        let mut state = self.state.lock();
        state.check_live(buffer.id, "write");
        if let Some(record) = state.buffers.get_mut(&buffer.id) {
            let start = offset as usize;
            let end = start + data.len();
            if record.contents.len() < end {
                record.contents.resize(end, 0);
            }
            record.contents[start..end].copy_from_slice(data);
        }
        state.events.push(Event::WriteBuffer { id: buffer.id });
    }
}

// ============================================================================
// Pass
// ============================================================================

pub struct MockPass {
    state: Arc<Mutex<State>>,
}

impl DrawPass<MockDevice> for MockPass {
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &MockBuffer) {
        let mut state = self.state.lock();
        state.check_live(buffer.id, "vertex bind");
        state.events.push(Event::SetVertexBuffer { slot, buffer: buffer.id });
    }

    fn set_index_buffer(&mut self, buffer: &MockBuffer) {
        let mut state = self.state.lock();
        state.check_live(buffer.id, "index bind");
        state.events.push(Event::SetIndexBuffer { buffer: buffer.id });
    }

    fn set_bind_group(&mut self, index: u32, bind_group: &MockBindGroup) {
        let mut state = self.state.lock();
        if let Some(buffer) = bind_group.buffer {
            state.check_live(buffer, "bind group bind");
        }
        state.events.push(Event::SetBindGroup {
            index,
            bind_group: bind_group.id,
            buffer: bind_group.buffer,
        });
    }

    fn draw_indexed(&mut self, index_count: u32, instance_count: u32) {
        self.state.lock().events.push(Event::DrawIndexed {
            index_count,
            instance_count,
        });
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const TRANSFORM_LAYOUT: MockLayout = MockLayout("transform");
pub const TEXTURE_LAYOUT: MockLayout = MockLayout("texture");
pub const CAMERA_LAYOUT: MockLayout = MockLayout("camera");

pub fn shared_material(device: &MockDevice) -> Arc<MaterialBinding<MockDevice>> {
    MaterialBinding::new_shared(device, &MockView(0), &MockSampler, &TEXTURE_LAYOUT, Some("Test Material"))
        .expect("material binding")
}

pub fn camera(device: &MockDevice) -> CameraBinding<MockDevice> {
    let camera = Camera::new_perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
    CameraBinding::new(device, &CAMERA_LAYOUT, &camera).expect("camera binding")
}

pub fn tracked_view(n: u32) -> Tracked<MockView> {
    Tracked::new(MockView(n))
}

/// Three vertices, three indices, no normals or UVs.
pub fn triangle() -> arbor::PrimitiveData {
    arbor::PrimitiveData {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        indices: vec![0, 1, 2],
        ..Default::default()
    }
}
