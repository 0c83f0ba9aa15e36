use bytemuck::{Pod, Zeroable};

/// Byte size of one fragment record: vec4 color, f32 depth, u32 next,
/// padded to the struct's 16-byte alignment.
pub const RECORD_SIZE: u64 = 32;

/// Head entries and `next` links store `slot + 1`; zero means "empty list"
/// / "end of list". This keeps the per-frame head clear a plain zero fill.
pub const EMPTY: u32 = 0;

/// Host mirror of the WGSL `FragmentNode` struct. The GPU writes these; the
/// host never reads them back. Kept for layout assertions and the CPU model
/// in the integration tests.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct FragmentRecord {
    pub color: [f32; 4],
    pub depth: f32,
    pub next: u32,
    pub _padding: [u32; 2],
}

/// Storage for one frame's transparent fragment records.
///
/// `resize` replaces the buffer with a fresh allocation of the requested
/// capacity; nothing is preserved. That is a contract, not an accident: the
/// transparent pass rewrites the store from scratch every frame, so there is
/// never anything worth keeping.
pub struct FragmentStore {
    buffer: wgpu::Buffer,
    capacity: u32,
}

impl FragmentStore {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: Self::create_buffer(device, 0),
            capacity: 0,
        }
    }

    /// Records the store can hold. The combine shader sees exactly this many
    /// slots via `arrayLength`.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Drops the current allocation and creates an empty one sized for
    /// `records` records. Callers must rebuild bind groups afterwards.
    pub fn resize(&mut self, device: &wgpu::Device, records: u32) {
        self.buffer = Self::create_buffer(device, records);
        self.capacity = records;
    }

    fn create_buffer(device: &wgpu::Device, records: u32) -> wgpu::Buffer {
        // wgpu rejects zero-sized storage bindings; an empty store keeps a
        // single never-referenced slot.
        let size = allocation_size(records);
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("FragmentStore"),
            size,
            usage: wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        })
    }
}

/// Bytes allocated for a store of `records` records.
pub fn allocation_size(records: u32) -> u64 {
    u64::from(records.max(1)) * RECORD_SIZE
}

/// Records the orchestrator requests for a counted fragment load. The count
/// can drift upward between the count and transparent passes while the scene
/// animates; the slack absorbs small drifts, larger ones drop fragments for
/// a frame.
pub fn padded_records(counted: u32) -> u32 {
    counted + counted / 2
}

/// Per-pixel list heads, one `u32` per pixel of the current resolution.
pub struct HeadTable {
    buffer: wgpu::Buffer,
    pixels: u32,
}

impl HeadTable {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let pixels = width.max(1) * height.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("HeadTable"),
            size: u64::from(pixels) * std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, pixels }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn pixels(&self) -> u32 {
        self.pixels
    }

    /// Zero-fills every entry in place, marking all lists empty.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_buffer(&self.buffer, 0, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_record_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<FragmentRecord>() as u64, RECORD_SIZE);
        // color at 0, depth at 16, next at 20
        assert_eq!(std::mem::offset_of!(FragmentRecord, depth), 16);
        assert_eq!(std::mem::offset_of!(FragmentRecord, next), 20);
    }

    #[test]
    fn allocation_is_exact_above_zero() {
        assert_eq!(allocation_size(1), RECORD_SIZE);
        assert_eq!(allocation_size(1000), 1000 * RECORD_SIZE);
    }

    #[test]
    fn empty_store_still_allocates_one_slot() {
        assert_eq!(allocation_size(0), RECORD_SIZE);
    }

    #[test]
    fn padding_adds_half_again() {
        assert_eq!(padded_records(0), 0);
        assert_eq!(padded_records(2), 3);
        assert_eq!(padded_records(1000), 1500);
    }
}
