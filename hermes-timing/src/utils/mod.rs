pub use range::Range;
pub use value::Value;

mod range;
mod value;
