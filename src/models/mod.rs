pub mod forecast;
pub mod recommendation;
pub mod sensor;
pub mod yield_record;

pub use forecast::*;
pub use recommendation::*;
pub use sensor::*;
pub use yield_record::*;
