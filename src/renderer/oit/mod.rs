pub mod counter;
pub mod pipeline;
pub mod store;

pub use counter::FragmentCounter;
pub use store::{allocation_size, padded_records, FragmentRecord, FragmentStore, HeadTable};
pub use store::{EMPTY, RECORD_SIZE};

pub(crate) use pipeline::OitPipelines;
