pub mod calculator;
pub mod types;

pub use calculator::aspect_orb;
pub use types::AspectKind;
