//! Domain Entities
//!
//! - `Content` - one named blob of generated data
//! - `State` - the complete output of one asset generation

mod state;

pub use state::{Content, State};
