// CPU mirror of the per-pixel linked-list contract shared by
// src/shader/transparent.wgsl and src/shader/combine.wgsl. The GPU passes
// need a surface to run, so the append/walk/sort/blend data contract is
// validated host-side instead.

use wgpu_oit::renderer::oit::{
    allocation_size, padded_records, FragmentRecord as Node, EMPTY, RECORD_SIZE,
};

// Must match MAX_FRAGMENTS in combine.wgsl
const MAX_FRAGMENTS: usize = 32;

const ZERO_NODE: Node = Node {
    color: [0.0; 4],
    depth: 0.0,
    next: EMPTY,
    _padding: [0; 2],
};

/// Head table, node store and counter for one simulated frame.
struct ListBuffers {
    heads: Vec<u32>,
    nodes: Vec<Node>,
    counter: u32,
}

impl ListBuffers {
    fn new(pixels: usize, capacity: usize) -> Self {
        Self {
            heads: vec![EMPTY; pixels],
            nodes: vec![ZERO_NODE; capacity],
            counter: 0,
        }
    }

    fn clear_heads(&mut self) {
        self.heads.fill(EMPTY);
    }
}

#[derive(Clone, Copy, Debug)]
struct Fragment {
    pixel: usize,
    color: [f32; 4],
    depth: f32,
}

fn frag(pixel: usize, color: [f32; 4], depth: f32) -> Fragment {
    Fragment {
        pixel,
        color,
        depth,
    }
}

/// Count pass: one increment per rasterized fragment.
fn count_pass(fragments: &[Fragment]) -> u32 {
    fragments.len() as u32
}

/// Transparent pass: claim a slot, link it in at the head. Slots past the
/// store's capacity are dropped, mirroring the bounds-checked GPU write.
fn append_pass(buffers: &mut ListBuffers, fragments: &[Fragment]) {
    for fragment in fragments {
        let slot = buffers.counter;
        buffers.counter += 1;
        if slot as usize >= buffers.nodes.len() {
            continue;
        }
        let previous = std::mem::replace(&mut buffers.heads[fragment.pixel], slot + 1);
        buffers.nodes[slot as usize] = Node {
            color: fragment.color,
            depth: fragment.depth,
            next: previous,
            _padding: [0; 2],
        };
    }
}

/// Follows one pixel's list. Asserts the structural invariants: every link
/// stays in range and the walk terminates before revisiting a node.
fn walk(buffers: &ListBuffers, pixel: usize) -> Vec<Node> {
    let mut out = Vec::new();
    let mut link = buffers.heads[pixel];
    while link != EMPTY {
        let index = (link - 1) as usize;
        assert!(index < buffers.nodes.len(), "dangling node index {link}");
        assert!(out.len() < buffers.nodes.len() + 1, "cycle in fragment list");
        let node = buffers.nodes[index];
        out.push(node);
        link = node.next;
    }
    out
}

/// Combine pass for one pixel: sort farthest-first, blend over the opaque
/// color.
fn resolve(buffers: &ListBuffers, pixel: usize, opaque: [f32; 3]) -> [f32; 3] {
    let mut list = walk(buffers, pixel);
    list.truncate(MAX_FRAGMENTS);
    list.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let mut color = opaque;
    for node in list {
        let alpha = node.color[3];
        for channel in 0..3 {
            color[channel] += (node.color[channel] - color[channel]) * alpha;
        }
    }
    color
}

#[test]
fn walk_visits_exactly_the_fragments_per_pixel() {
    let fragments = [
        frag(0, [1.0, 0.0, 0.0, 0.5], 0.3),
        frag(2, [0.0, 1.0, 0.0, 0.5], 0.4),
        frag(0, [0.0, 0.0, 1.0, 0.5], 0.5),
        frag(2, [1.0, 1.0, 0.0, 0.5], 0.6),
        frag(0, [1.0, 0.0, 1.0, 0.5], 0.7),
    ];
    let mut buffers = ListBuffers::new(4, fragments.len());
    append_pass(&mut buffers, &fragments);

    assert_eq!(walk(&buffers, 0).len(), 3);
    assert_eq!(walk(&buffers, 1).len(), 0);
    assert_eq!(walk(&buffers, 2).len(), 2);
    assert_eq!(walk(&buffers, 3).len(), 0);
}

#[test]
fn count_pass_and_transparent_pass_agree_for_a_static_scene() {
    let fragments: Vec<Fragment> = (0..100)
        .map(|i| frag(i % 7, [0.5; 4], i as f32 / 100.0))
        .collect();

    let counted = count_pass(&fragments);
    let mut buffers = ListBuffers::new(7, counted as usize);
    append_pass(&mut buffers, &fragments);

    assert_eq!(buffers.counter, counted);
    let total: usize = (0..7).map(|p| walk(&buffers, p).len()).sum();
    assert_eq!(total as u32, counted);
}

#[test]
fn store_capacity_follows_the_latest_resize_exactly() {
    // Resizing to M must land on exactly M records of storage, whatever
    // the previous capacity was.
    for records in [1u32, 3, 100, 1500] {
        assert_eq!(allocation_size(records), u64::from(records) * RECORD_SIZE);
    }
    // The empty store keeps a single never-referenced slot
    assert_eq!(allocation_size(0), RECORD_SIZE);
}

#[test]
fn padded_capacity_always_covers_the_counted_load() {
    for counted in [0u32, 1, 2, 13, 1000, 12345] {
        assert!(padded_records(counted) >= counted);
    }
}

#[test]
fn cleared_heads_yield_empty_lists() {
    let fragments = [
        frag(0, [1.0, 0.0, 0.0, 0.5], 0.3),
        frag(1, [0.0, 1.0, 0.0, 0.5], 0.4),
    ];
    let mut buffers = ListBuffers::new(2, 2);
    append_pass(&mut buffers, &fragments);
    assert_eq!(walk(&buffers, 0).len(), 1);

    buffers.clear_heads();
    assert_eq!(walk(&buffers, 0).len(), 0);
    assert_eq!(walk(&buffers, 1).len(), 0);
}

#[test]
fn zero_transparent_geometry_passes_opaque_through() {
    let fragments: [Fragment; 0] = [];
    assert_eq!(count_pass(&fragments), 0);

    let mut buffers = ListBuffers::new(4, padded_records(0) as usize);
    append_pass(&mut buffers, &fragments);

    let opaque = [0.812, 0.992, 1.0];
    for pixel in 0..4 {
        assert_eq!(resolve(&buffers, pixel, opaque), opaque);
    }
}

#[test]
fn single_layer_coverage_makes_singleton_lists() {
    // One triangle covering K pixels: one fragment per pixel, no prior list
    let k = 64;
    let fragments: Vec<Fragment> = (0..k).map(|p| frag(p, [0.9, 0.1, 0.1, 0.4], 0.5)).collect();

    let counted = count_pass(&fragments);
    assert_eq!(counted as usize, k);

    let mut buffers = ListBuffers::new(k, counted as usize);
    append_pass(&mut buffers, &fragments);
    assert_eq!(buffers.counter as usize, k);

    for pixel in 0..k {
        let list = walk(&buffers, pixel);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].next, EMPTY);
    }
}

#[test]
fn blending_orders_by_depth_not_insertion() {
    let near = frag(0, [0.0, 0.0, 1.0, 0.5], 0.4);
    let far = frag(0, [1.0, 0.0, 0.0, 0.5], 0.8);
    let opaque = [0.2, 0.2, 0.2];

    let mut near_first = ListBuffers::new(1, 2);
    append_pass(&mut near_first, &[near, far]);
    let mut far_first = ListBuffers::new(1, 2);
    append_pass(&mut far_first, &[far, near]);

    let a = resolve(&near_first, 0, opaque);
    let b = resolve(&far_first, 0, opaque);
    assert_eq!(a, b);

    // Far red blended first: (0.6, 0.1, 0.1); near blue over it:
    // (0.3, 0.05, 0.55)
    let expected = [0.3, 0.05, 0.55];
    for channel in 0..3 {
        assert!((a[channel] - expected[channel]).abs() < 1e-6);
    }
}

#[test]
fn overflow_drops_fragments_but_keeps_lists_valid() {
    // More fragments than the store was sized for: the surplus vanishes,
    // everything that did land stays walkable.
    let fragments: Vec<Fragment> = (0..20).map(|i| frag(i % 4, [0.5; 4], 0.5)).collect();
    let mut buffers = ListBuffers::new(4, 8);
    append_pass(&mut buffers, &fragments);

    assert_eq!(buffers.counter, 20);
    let total: usize = (0..4).map(|p| walk(&buffers, p).len()).sum();
    assert_eq!(total, 8);
}
