//! HTTP surface for the SEL inference engine.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub mod prelude {
    pub use crate::error::ApiError;
    pub use crate::router::create_router;
    pub use crate::state::ApiState;
}
