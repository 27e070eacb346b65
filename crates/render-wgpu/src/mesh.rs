use bytemuck::Pod;

/// Growable vertex/index buffer pair with monotonic capacity.
///
/// Uploads that fit the current allocation reuse it; larger uploads
/// reallocate once, to exactly the (copy-aligned) upload size. Drop
/// releases both buffers.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    vertex_count: u32,
    index_buffer: wgpu::Buffer,
    index_capacity: u64,
    index_count: u32,
    layout: wgpu::VertexBufferLayout<'static>,
}

impl Mesh {
    /// Buffers start empty; the first upload allocates.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        layout: wgpu::VertexBufferLayout<'static>,
    ) -> Self {
        Self {
            vertex_buffer: create_buffer(device, label, 0, wgpu::BufferUsages::VERTEX),
            vertex_capacity: 0,
            vertex_count: 0,
            index_buffer: create_buffer(device, label, 0, wgpu::BufferUsages::INDEX),
            index_capacity: 0,
            index_count: 0,
            layout,
        }
    }

    pub fn set_vertices<T: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[T],
    ) {
        self.vertex_count = vertices.len() as u32;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let needed = aligned_size(bytes.len() as u64);
        if let Some(capacity) = grown_capacity(self.vertex_capacity, needed) {
            self.vertex_buffer =
                create_buffer(device, "mesh_vertices", capacity, wgpu::BufferUsages::VERTEX);
            self.vertex_capacity = capacity;
        }
        upload(queue, &self.vertex_buffer, bytes);
    }

    pub fn set_indices<T: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        indices: &[T],
    ) {
        self.index_count = indices.len() as u32;
        let bytes: &[u8] = bytemuck::cast_slice(indices);
        let needed = aligned_size(bytes.len() as u64);
        if let Some(capacity) = grown_capacity(self.index_capacity, needed) {
            self.index_buffer =
                create_buffer(device, "mesh_indices", capacity, wgpu::BufferUsages::INDEX);
            self.index_capacity = capacity;
        }
        upload(queue, &self.index_buffer, bytes);
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_capacity_bytes(&self) -> u64 {
        self.vertex_capacity
    }

    pub fn index_capacity_bytes(&self) -> u64 {
        self.index_capacity
    }

    pub fn layout(&self) -> &wgpu::VertexBufferLayout<'static> {
        &self.layout
    }
}

fn create_buffer(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Queue copies must be 4-byte aligned; odd-length uploads (u16 index
/// slices of odd count) go through a padded scratch copy.
fn upload(queue: &wgpu::Queue, buffer: &wgpu::Buffer, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let aligned = aligned_size(bytes.len() as u64) as usize;
    if aligned == bytes.len() {
        queue.write_buffer(buffer, 0, bytes);
    } else {
        let mut padded = bytes.to_vec();
        padded.resize(aligned, 0);
        queue.write_buffer(buffer, 0, &padded);
    }
}

fn aligned_size(len: u64) -> u64 {
    len.div_ceil(wgpu::COPY_BUFFER_ALIGNMENT) * wgpu::COPY_BUFFER_ALIGNMENT
}

/// `Some(new capacity)` when `needed` does not fit `current`. The new
/// capacity is exactly the needed size, never a growth factor.
fn grown_capacity(current: u64, needed: u64) -> Option<u64> {
    (needed > current).then_some(needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_round_up_to_copy_alignment() {
        assert_eq!(aligned_size(0), 0);
        assert_eq!(aligned_size(1), 4);
        assert_eq!(aligned_size(4), 4);
        assert_eq!(aligned_size(6), 8);
        assert_eq!(aligned_size(80), 80);
    }

    #[test]
    fn capacity_grows_to_exactly_the_upload_and_never_shrinks() {
        let uploads = [100u64, 50, 200, 120, 200];
        let mut capacity = 0u64;
        let mut reallocations = Vec::new();
        for upload in uploads {
            if let Some(new_capacity) = grown_capacity(capacity, upload) {
                capacity = new_capacity;
                reallocations.push(new_capacity);
            }
        }
        // Exactly one reallocation per oversized upload, sized to it.
        assert_eq!(reallocations, vec![100, 200]);
        assert_eq!(capacity, 200);
    }

    #[test]
    fn fitting_upload_keeps_capacity() {
        assert_eq!(grown_capacity(200, 200), None);
        assert_eq!(grown_capacity(200, 80), None);
        assert_eq!(grown_capacity(200, 201), Some(201));
    }
}
