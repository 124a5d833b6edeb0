pub mod columns;
pub mod etl;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{RawRecord, RawTable, Sighting, TransformResult, TransformStats};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
