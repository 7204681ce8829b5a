//! Dependency resolution
//!
//! | Module | Contents |
//! |---|---|
//! | [`source`] | Where a dependency lives and its stable identity |
//! | [`fetch`] | Materializing git sources locally |
//! | [`resolved`] | The runtime [`Dependency`] produced by resolution |
//! | [`resolver`] | Recursive resolution with cycle detection |

pub mod fetch;
pub mod resolved;
pub mod resolver;
pub mod source;

pub use fetch::{GitFetcher, SourceFetcher};
pub use resolved::Dependency;
pub use resolver::{DependencyResolver, Resolution, Resolver};
pub use source::{DependencyId, DependencySource, GitRevision, GitSource};
