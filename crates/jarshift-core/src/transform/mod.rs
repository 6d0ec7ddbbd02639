//! Pluggable per-resource transformation.
//!
//! The rewriter hands every eligible entry to a [`Transformer`] and uses the
//! answer to build the output archive. Any engine fits the contract: a
//! bytecode rewriter, a text substitution engine like [`PrefixRenamer`], or
//! [`IdentityTransformer`].
//!
//! Closures work too:
//!
//! ```
//! use jarshift_core::Resource;
//! use jarshift_core::TransformError;
//! use jarshift_core::transform::Transformer;
//!
//! let upper = |res: &Resource| -> Result<Option<Resource>, TransformError> {
//!     if res.name().ends_with(".txt") {
//!         Ok(Some(Resource::new(res.name(), res.data().to_ascii_uppercase())))
//!     } else {
//!         Ok(None)
//!     }
//! };
//!
//! let out = upper.transform(&Resource::new("a.txt", b"hi".to_vec())).unwrap();
//! assert_eq!(out.unwrap().data(), b"HI");
//! ```

pub mod prefix;

pub use prefix::PrefixRenamer;
pub use prefix::PrefixRule;

use crate::Resource;
use crate::TransformError;

/// Rewrites one resource.
///
/// Returns `Ok(Some(resource))` with the replacement, which may carry a new
/// name, or `Ok(None)` when the resource needs no change. A replacement is
/// always counted as a change.
///
/// Implementations must not depend on the order resources arrive in and
/// must not keep references to them.
pub trait Transformer {
    /// Transforms `resource`.
    ///
    /// # Errors
    ///
    /// Any error aborts the pipeline run for the current archive.
    fn transform(&self, resource: &Resource) -> Result<Option<Resource>, TransformError>;
}

impl<F> Transformer for F
where
    F: Fn(&Resource) -> Result<Option<Resource>, TransformError>,
{
    fn transform(&self, resource: &Resource) -> Result<Option<Resource>, TransformError> {
        self(resource)
    }
}

/// Transformer that never changes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, _resource: &Resource) -> Result<Option<Resource>, TransformError> {
        Ok(None)
    }
}
