pub mod access;
pub mod domain;
pub mod identity;

pub use access::AccessError;
pub use domain::{Editor, User, UserId, Viewer};
pub use identity::resolve_viewer;
