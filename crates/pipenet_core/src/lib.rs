pub mod api;
pub mod context;
pub mod error;
pub mod flow;
pub mod ids;
pub mod ops;
pub mod search;
pub mod security;
pub mod timestamp;
pub mod value;

pub use api::*;
pub use context::QueryContext;
pub use error::{PipenetError, PipenetResult};
pub use flow::*;
pub use ids::*;
pub use ops::*;
pub use search::*;
pub use security::*;
pub use timestamp::*;
pub use value::*;
