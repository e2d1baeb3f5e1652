pub mod decorator;
pub mod generator;
pub mod manager;
pub mod region;
pub mod short;

pub use decorator::{FragmentDecorator, GraphDecorator};
pub use generator::FragmentGenerator;
pub use manager::{
    DirectUpdates, FragmentError, FragmentManager, GraphElement, UpdateListener, UpdateRequest,
};
pub use region::Fragment;
pub use short::{PinnedNodes, ShortFragmentGenerator};
