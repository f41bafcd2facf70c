use crate::Value;

/// An argument list accepted by `emit` and `emit_sync`.
///
/// Implemented for `()`, tuples of up to six `Into<Value>` members, and a
/// prebuilt `Vec<Value>`.
///
/// A `Vec<Value>` is the whole argument list, not one `list` argument. To emit a
/// single list, wrap it in a one-element tuple: `(vec![..],)`.
///
/// # Example
/// ```
/// use rs_topics::{IntoArgs, Kind};
///
/// let args = ("ready", 5u64).into_args();
/// assert_eq!(args.len(), 2);
/// assert_eq!(args[1].kind(), Kind::U64);
/// ```
pub trait IntoArgs {
    fn into_args(self) -> Vec<Value>;
}

impl IntoArgs for Vec<Value> {
    fn into_args(self) -> Vec<Value> {
        self
    }
}

macro_rules! impl_into_args {
    ($($arg:ident),*) => {
        impl<$($arg: Into<Value>,)*> IntoArgs for ($($arg,)*) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Value> {
                let ($($arg,)*) = self;
                vec![$($arg.into()),*]
            }
        }
    };
}

impl_into_args!();
impl_into_args!(A1);
impl_into_args!(A1, A2);
impl_into_args!(A1, A2, A3);
impl_into_args!(A1, A2, A3, A4);
impl_into_args!(A1, A2, A3, A4, A5);
impl_into_args!(A1, A2, A3, A4, A5, A6);
