pub mod depth;
pub mod lights;
pub mod oit;
pub mod pipeline_builder;
pub mod primitives;
pub mod renderer;
pub mod targets;
pub mod uniforms;
pub mod vertex;

pub(crate) mod internal;

pub use depth::Depth;
pub use lights::{LightsData, PointLightData};
pub use pipeline_builder::PipelineBuilder;
pub use renderer::{FrameStats, Renderer};
pub use targets::OpaqueTarget;
pub use uniforms::{CameraUniform, ScreenUniform};
pub use vertex::{v, QuadVertex, Vertex, FULLSCREEN_QUAD};
