pub mod buffers;
pub mod context;

pub(crate) use buffers::{CameraBuffer, LightsBuffer, ObjectData, ObjectsBuffer};
pub(crate) use context::RenderContext;
