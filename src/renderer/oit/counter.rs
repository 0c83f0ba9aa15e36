use std::sync::mpsc;

/// GPU-resident fragment counter, incremented with `atomicAdd` by the count
/// and transparent passes.
///
/// The host never sees the counter's memory directly. `read` copies it into
/// a staging buffer and blocks on a device fence before touching the mapped
/// bytes; `reset` goes through the queue, which orders the write after all
/// previously submitted GPU work. Those two entry points are the only host
/// access paths.
pub struct FragmentCounter {
    buffer: wgpu::Buffer,
    staging: wgpu::Buffer,
}

impl FragmentCounter {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("FragmentCounter"),
            size: std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("FragmentCounterStaging"),
            size: std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self { buffer, staging }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Zeroes the counter. The write lands between the submissions that
    /// precede and follow it, so earlier increments are never clobbered and
    /// later passes start from zero.
    pub fn reset(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&0u32));
    }

    /// Reads the counter, blocking until every previously submitted GPU
    /// increment has completed.
    pub fn read(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> u32 {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("CounterReadback"),
        });
        encoder.copy_buffer_to_buffer(
            &self.buffer,
            0,
            &self.staging,
            0,
            std::mem::size_of::<u32>() as u64,
        );
        queue.submit(Some(encoder.finish()));

        let slice = self.staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        // Fence: block until the GPU has executed the copy and signalled
        // the mapping.
        let _ = device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });

        receiver
            .recv()
            .expect("Fragment counter map callback dropped")
            .expect("Failed to map fragment counter staging buffer");

        let value = {
            let data = slice.get_mapped_range();
            u32::from_le_bytes([data[0], data[1], data[2], data[3]])
        };
        self.staging.unmap();
        value
    }
}
