use aperture_render::CameraConstants;
use tracing::{debug, error};

use crate::RenderError;

/// Ring depth: the CPU may populate slot `i` while the GPU still consumes
/// slot `i - 1`.
pub const FRAME_RING_DEPTH: usize = 2;

/// The size-dependent half of a frame slot: color and depth/stencil
/// attachments plus their views, recreated together on every resize.
pub struct FrameTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl FrameTarget {
    fn create(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        validate_extent(width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frame_depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: depth_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            color,
            color_view,
            depth_view,
            width,
            height,
        })
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copy this target's color content onto `destination` (the
    /// presentation surface). The copied extent is clamped to the smaller
    /// of the two, which only matters for the one frame where a resize
    /// event and the surface reconfigure race.
    pub fn blit_to(&self, encoder: &mut wgpu::CommandEncoder, destination: &wgpu::Texture) {
        let extent = wgpu::Extent3d {
            width: self.width.min(destination.width()),
            height: self.height.min(destination.height()),
            depth_or_array_layers: 1,
        };
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: destination,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            extent,
        );
    }
}

/// One frame's GPU residence: a constant buffer and bind group created
/// once for the life of the ring, plus the size-dependent target.
/// `target == None` is the explicit degraded/skip state.
pub struct FrameSlot {
    index: usize,
    constants: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    target: Option<FrameTarget>,
}

impl FrameSlot {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn target(&self) -> Option<&FrameTarget> {
        self.target.as_ref()
    }
}

/// Double-buffered frame resources.
///
/// Constant regions are written through the queue, never through a live
/// mapping: wgpu's queue ordering supplies the synchronization the ring
/// depth alone does not guarantee.
pub struct FrameRing {
    slots: Vec<FrameSlot>,
    frame_index: usize,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl FrameRing {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        width: i32,
        height: i32,
    ) -> Self {
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("frame_constants_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let slots = (0..FRAME_RING_DEPTH)
            .map(|index| {
                let constants = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("frame_constants"),
                    size: CameraConstants::SIZE,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("frame_constants_bind_group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: constants.as_entire_binding(),
                    }],
                });
                FrameSlot {
                    index,
                    constants,
                    bind_group,
                    target: None,
                }
            })
            .collect();

        let mut ring = Self {
            slots,
            frame_index: 0,
            color_format,
            depth_format,
            bind_group_layout,
        };
        ring.resize(device, width, height);
        ring
    }

    /// Recreate every slot's attachments at the given size. Degenerate
    /// dimensions release the attachments instead of allocating; an
    /// attachment the device rejects leaves that slot degraded until the
    /// next successful resize. Neither case aborts.
    pub fn resize(&mut self, device: &wgpu::Device, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            debug!(width, height, "degenerate size, releasing frame targets");
            for slot in &mut self.slots {
                slot.target = None;
            }
            return;
        }

        for slot in &mut self.slots {
            slot.target = match FrameTarget::create(
                device,
                self.color_format,
                self.depth_format,
                width as u32,
                height as u32,
            ) {
                Ok(target) => Some(target),
                Err(err) => {
                    error!(slot = slot.index, "frame target unusable: {err}");
                    None
                }
            };
        }
    }

    /// The slot to render into and write constants for this tick.
    pub fn current(&self) -> &FrameSlot {
        &self.slots[self.frame_index]
    }

    /// Write this tick's constants into the current slot through the
    /// queue.
    pub fn write_constants(&self, queue: &wgpu::Queue, constants: &CameraConstants) {
        queue.write_buffer(
            &self.slots[self.frame_index].constants,
            0,
            bytemuck::bytes_of(constants),
        );
    }

    /// Step to the next slot; call exactly once per tick, after the
    /// frame's commands are submitted.
    pub fn advance(&mut self) {
        self.frame_index = next_index(self.frame_index, self.slots.len());
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }
}

fn next_index(index: usize, depth: usize) -> usize {
    (index + 1) % depth
}

fn validate_extent(width: u32, height: u32, max: u32) -> Result<(), RenderError> {
    if width > max || height > max {
        return Err(RenderError::AttachmentTooLarge { width, height, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_advances_by_one_modulo_depth() {
        let mut index = 0;
        let walked: Vec<usize> = (0..5)
            .map(|_| {
                index = next_index(index, FRAME_RING_DEPTH);
                index
            })
            .collect();
        assert_eq!(walked, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn extent_validation_matches_device_limit() {
        assert!(validate_extent(8192, 8192, 8192).is_ok());
        let err = validate_extent(8193, 100, 8192).unwrap_err();
        assert!(matches!(err, RenderError::AttachmentTooLarge { .. }));
    }
}
