pub mod executor;
pub mod interrupt;
pub mod render;
pub mod resource;
pub mod transform;

pub use executor::{Executor, ExecutorError, SyncExecutor};
pub use interrupt::Interrupt;
pub use render::{ImageLinks, RenderJob, RenderOutcome, Renderer};
pub use resource::{AssetError, AssetProvider, InMemoryAssetProvider, SharedAssetData};
pub use transform::{SvgTransform, TransformError, TranscriptTransform};
