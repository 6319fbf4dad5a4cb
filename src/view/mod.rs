mod filter;
mod reduce;
mod transform;

pub use filter::{Filter, FilterIter, FilterRange, filter};
pub use reduce::{Reduce, ReduceWith, reduce, reduce_with};
pub use transform::{Transform, TransformIter, TransformRange, keys, transform, values};
