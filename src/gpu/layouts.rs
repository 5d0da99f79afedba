//! Bind group and vertex slot conventions.
//!
//! The pipeline layout, the importer and the frame traversal all agree on the
//! numbering below. Renumbering any of them means renumbering all of them.

/// Bind group slot of the caller-supplied camera binding.
pub const CAMERA_GROUP: u32 = 0;
/// Bind group slot of the per-node model transform.
pub const TRANSFORM_GROUP: u32 = 1;
/// Bind group slot of the per-primitive material (texture + sampler).
pub const MATERIAL_GROUP: u32 = 2;

/// Vertex buffer slot for positions (`Float32x3`).
pub const POSITION_SLOT: u32 = 0;
/// Vertex buffer slot for normals (`Float32x3`).
pub const NORMAL_SLOT: u32 = 1;
/// Vertex buffer slot for texture coordinates (`Float32x2`).
pub const UV_SLOT: u32 = 2;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const UV_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];

/// The three bind group layouts shared by every node and primitive.
#[derive(Debug)]
pub struct SceneLayouts {
    /// One uniform buffer, visible to vertex and fragment stages.
    pub camera: wgpu::BindGroupLayout,
    /// One uniform buffer holding a single `mat4x4<f32>`, vertex stage.
    pub transform: wgpu::BindGroupLayout,
    /// Filterable 2-D float texture at binding 0, filtering sampler at
    /// binding 1, fragment stage.
    pub material: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });

        let transform = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Transform Layout"),
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX)],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self { camera, transform, material }
    }

    /// Bind group layouts in slot order, for building the pipeline layout.
    #[must_use]
    pub fn ordered(&self) -> [&wgpu::BindGroupLayout; 3] {
        [&self.camera, &self.transform, &self.material]
    }
}

fn uniform_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Non-interleaved vertex buffer layouts in slot order
/// (positions, normals, UVs).
#[must_use]
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &NORMAL_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: 8,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &UV_ATTRIBUTES,
        },
    ]
}
