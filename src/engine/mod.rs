pub mod cache;
pub mod novelty;

pub use cache::SeenLinkStore;
pub use novelty::{partition, SeenSet};
