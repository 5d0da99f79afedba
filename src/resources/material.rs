//! Material bindings and their identity-keyed cache.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::Result;
use crate::gpu::GpuDevice;
use crate::resources::tracked::Tracked;

/// A device-allocated texture + sampler bind group.
///
/// The texture view and sampler are owned by whoever loaded the image; the
/// binding only references them. Geometry holds it through an `Arc`, so it
/// is released exactly once, after the last referencing primitive is gone.
pub struct MaterialBinding<D: GpuDevice> {
    bind_group: D::BindGroup,
    label: Option<String>,
}

impl<D: GpuDevice> MaterialBinding<D> {
    /// Allocates one bind group referencing `view` and `sampler` against
    /// `layout`.
    ///
    /// Every call allocates; reuse one instance per distinct texture (see
    /// [`MaterialCache`]) rather than constructing duplicates.
    pub fn new(
        device: &D,
        view: &D::TextureView,
        sampler: &D::Sampler,
        layout: &D::BindGroupLayout,
        label: Option<&str>,
    ) -> Result<Self> {
        let bind_group = device.create_texture_bind_group(label, layout, view, sampler)?;
        log::debug!("Created material binding {label:?}");
        Ok(Self {
            bind_group,
            label: label.map(str::to_string),
        })
    }

    /// Convenience for the common case of a single shared material.
    pub fn new_shared(
        device: &D,
        view: &D::TextureView,
        sampler: &D::Sampler,
        layout: &D::BindGroupLayout,
        label: Option<&str>,
    ) -> Result<Arc<Self>> {
        Self::new(device, view, sampler, layout, label).map(Arc::new)
    }

    #[inline]
    pub fn bind_group(&self) -> &D::BindGroup {
        &self.bind_group
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<D: GpuDevice> Drop for MaterialBinding<D> {
    fn drop(&mut self) {
        log::trace!("Releasing material binding {:?}", self.label);
    }
}

impl<D: GpuDevice> std::fmt::Debug for MaterialBinding<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialBinding")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// One [`MaterialBinding`] per distinct `(texture view, sampler)` pair.
///
/// The cache holds a strong reference to every binding it created; call
/// [`MaterialCache::clear`] (or drop the cache) once the scene is gone to let
/// the last reference go.
pub struct MaterialCache<D: GpuDevice> {
    entries: FxHashMap<(u64, u64), Arc<MaterialBinding<D>>>,
}

impl<D: GpuDevice> MaterialCache<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Returns the binding for this view/sampler pair, creating it on first
    /// request.
    pub fn get_or_create(
        &mut self,
        device: &D,
        view: &Tracked<D::TextureView>,
        sampler: &Tracked<D::Sampler>,
        layout: &D::BindGroupLayout,
    ) -> Result<Arc<MaterialBinding<D>>> {
        let key = (view.id(), sampler.id());
        if let Some(existing) = self.entries.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let label = format!("Material (view #{}, sampler #{})", key.0, key.1);
        let binding = MaterialBinding::new_shared(device, view, sampler, layout, Some(&label))?;
        self.entries.insert(key, Arc::clone(&binding));
        Ok(binding)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the cache's references. Bindings still held by geometry stay
    /// alive until that geometry is destroyed.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<D: GpuDevice> Default for MaterialCache<D> {
    fn default() -> Self {
        Self::new()
    }
}
