pub mod primary;
pub mod secondary;

pub use primary::{PrimaryChain, Strategy};
pub use secondary::{query_templates, SecondaryChain};
