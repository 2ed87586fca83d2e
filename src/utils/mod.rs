pub mod dedupe;
pub mod facets;
pub mod messages;
pub mod paging;
pub mod why;

pub use dedupe::*;
pub use facets::*;
pub use messages::*;
pub use paging::*;
pub use why::*;
