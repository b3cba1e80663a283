mod decide;
mod node;
mod search;
mod target;

pub use decide::*;
pub use node::*;
pub use search::*;
pub use target::*;
