/// Transaction models and their RLP encoding.
pub mod model;
/// The node interface transactions are submitted through.
pub mod provider;
/// Transaction signing.
pub mod signing;

pub mod prelude {
    // Exports from upstream libraries
    pub use lending_common::prelude::*;

    // Exports from this crate
    pub use super::model::*;
    pub use super::provider::*;
    pub use super::signing::*;
}

pub(crate) mod internal_prelude {
    pub use crate::prelude::*;
}
