mod metric;
mod oracle;
mod walls;

pub use metric::*;
pub use oracle::*;
pub use walls::*;
