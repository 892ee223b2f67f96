pub mod activation;
pub mod distributed;
pub mod loss;
pub mod shape;

pub use activation::*;
pub use distributed::*;
pub use loss::*;
pub use shape::*;
