use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::{EmitterError, Kind, Value};

/// The ordered parameter kinds shared by every handler of a topic.
///
/// A topic's signature is taken from the first handler registered under it and
/// never changes afterwards.
///
/// # Example
/// ```
/// use rs_topics::{Kind, Signature};
///
/// let signature = Signature::from(vec![Kind::String, Kind::U64]);
/// assert_eq!(signature.len(), 2);
/// assert_eq!(signature.to_string(), "(string, u64)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Arc<[Kind]>);

impl Signature {
    pub fn kinds(&self) -> &[Kind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks a handler's parameter kinds against this signature.
    ///
    /// # Returns
    /// * `Err(EmitterError::ArityMismatch)` if the parameter counts differ.
    /// * `Err(EmitterError::TypeMismatch)` for the first position whose kind differs.
    pub fn check_handler(&self, topic: &str, params: &Signature) -> Result<(), EmitterError> {
        if params.len() != self.len() {
            return Err(EmitterError::ArityMismatch {
                topic: topic.to_owned(),
                expected: self.len(),
                actual: params.len(),
            });
        }
        let mismatch = self
            .kinds()
            .iter()
            .zip(params.kinds())
            .position(|(expected, actual)| expected != actual);
        match mismatch {
            Some(position) => Err(EmitterError::TypeMismatch {
                topic: topic.to_owned(),
                position,
                expected: self.0[position],
                actual: params.0[position],
            }),
            None => Ok(()),
        }
    }

    /// Checks an emitted argument list against this signature.
    ///
    /// # Returns
    /// * `Err(EmitterError::ArgumentCountMismatch)` if the argument count differs.
    /// * `Err(EmitterError::ArgumentTypeMismatch)` for the first argument whose kind differs.
    pub fn check_args(&self, topic: &str, args: &[Value]) -> Result<(), EmitterError> {
        if args.len() != self.len() {
            return Err(EmitterError::ArgumentCountMismatch {
                topic: topic.to_owned(),
                expected: self.len(),
                actual: args.len(),
            });
        }
        for (position, (expected, arg)) in self.kinds().iter().zip(args).enumerate() {
            if arg.kind() != *expected {
                return Err(EmitterError::ArgumentTypeMismatch {
                    topic: topic.to_owned(),
                    position,
                    expected: *expected,
                    actual: arg.kind(),
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<Kind>> for Signature {
    fn from(kinds: Vec<Kind>) -> Self {
        Self(Arc::from(kinds))
    }
}

impl From<&[Kind]> for Signature {
    fn from(kinds: &[Kind]) -> Self {
        Self(Arc::from(kinds))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        f.write_str(")")
    }
}
