pub mod align;
pub mod chapters;
pub mod speech;
pub mod title;
pub mod transcript;

pub use align::*;
pub use chapters::*;
pub use speech::*;
pub use title::*;
pub use transcript::*;
