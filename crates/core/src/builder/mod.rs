//! Mutable, name-keyed accumulators for every entity of the graph.
//!
//! Builders are filled during intake without looking at any other class.
//! Each one is consumed by its `finish` step, which resolves names through the
//! registry and yields the immutable entity. None of them is `Clone`, so a
//! builder cannot be finished twice:
//!
//! ```compile_fail
//! fn finishable_twice<T: Clone>() {}
//! finishable_twice::<archscope_core::builder::ClassBuilder>();
//! ```
//!
//! ```compile_fail
//! fn finishable_twice<T: Clone>() {}
//! finishable_twice::<archscope_core::builder::MemberBuilder>();
//! ```

pub mod access;
pub mod annotation;
pub mod class;
pub mod member;
pub mod types;

pub use access::AccessBuilder;
pub use annotation::AnnotationBuilder;
pub use class::ClassBuilder;
pub use member::MemberBuilder;
pub use types::{ParameterizedTypeBuilder, TypeBuilder, TypeParameterBuilder, WildcardTypeBuilder};
