pub mod click;
pub mod common;
pub mod jobs;
pub mod search;
pub mod subscription;
pub mod watch;

pub use click::*;
pub use common::*;
pub use jobs::*;
pub use search::*;
pub use subscription::*;
pub use watch::*;
