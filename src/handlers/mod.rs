pub mod clicks;
pub mod health;
pub mod jobs;
pub mod search;
pub mod subscribe;
pub mod watch;

pub use clicks::*;
pub use health::*;
pub use jobs::*;
pub use search::*;
pub use subscribe::*;
pub use watch::*;
