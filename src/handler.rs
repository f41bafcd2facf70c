use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::error::{ConversionError, NotCallable};
use crate::{Arg, BoxError, HandlerFn, HandlerResult, Signature, Value};

/// A callable with a declared parameter signature.
///
/// Typed closures become handlers through [`IntoHandler`]; handlers whose
/// parameters are only known at runtime are built with [`Handler::dynamic`].
/// Cloning is cheap: the body is shared.
#[derive(Clone)]
pub struct Handler {
    params: Signature,
    func: HandlerFn,
}

impl Handler {
    /// Builds a handler from explicit parameter kinds and a body taking raw values.
    ///
    /// The body is only ever called with arguments already checked against `params`.
    ///
    /// # Example
    /// ```
    /// use rs_topics::{Handler, Kind, Value};
    ///
    /// let handler = Handler::dynamic(vec![Kind::U64], |args: &[Value]| {
    ///     println!("got {:?}", args[0]);
    ///     Ok(())
    /// });
    /// assert_eq!(handler.params().kinds(), &[Kind::U64]);
    /// ```
    pub fn dynamic<F>(params: impl Into<Signature>, func: F) -> Self
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            params: params.into(),
            func: Arc::new(func),
        }
    }

    pub fn params(&self) -> &Signature {
        &self.params
    }

    /// Invokes the handler body. Return values other than failure are discarded.
    #[inline]
    pub fn call(&self, args: &[Value]) -> HandlerResult {
        (self.func)(args)
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// What a typed handler closure may return.
pub trait HandlerOutput {
    fn into_result(self) -> HandlerResult;
}

impl HandlerOutput for () {
    fn into_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E: Into<BoxError>> HandlerOutput for Result<(), E> {
    fn into_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

/// Conversion into a [`Handler`], deriving its signature from the parameter types.
///
/// `Marker` only disambiguates the implementations and is always inferred.
///
/// # Example
/// ```
/// use rs_topics::{IntoHandler, Kind};
///
/// let handler = (|name: String, value: u64| println!("{name}: {value}"))
///     .into_handler()
///     .unwrap();
/// assert_eq!(handler.params().kinds(), &[Kind::String, Kind::U64]);
/// ```
pub trait IntoHandler<Marker>: Sized {
    fn into_handler(self) -> Result<Handler, NotCallable>;
}

/// Marker for handlers supplied as runtime values.
#[doc(hidden)]
pub struct Dynamic;

impl IntoHandler<Dynamic> for Handler {
    fn into_handler(self) -> Result<Handler, NotCallable> {
        Ok(self)
    }
}

impl IntoHandler<Dynamic> for Value {
    fn into_handler(self) -> Result<Handler, NotCallable> {
        match self {
            Value::Func(handler) => Ok(handler),
            other => Err(NotCallable(other.kind())),
        }
    }
}

fn extract<A: Arg>(args: &[Value], position: usize) -> Result<A, ConversionError> {
    args.get(position)
        .and_then(A::from_value)
        .ok_or(ConversionError {
            position,
            expected: std::any::type_name::<A>(),
        })
}

macro_rules! impl_into_handler {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> IntoHandler<(R, $($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: HandlerOutput,
            $($arg: Arg,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_handler(self) -> Result<Handler, NotCallable> {
                let params = Signature::from(vec![$(<$arg as Arg>::KIND),*]);
                Ok(Handler {
                    params,
                    func: Arc::new(move |args: &[Value]| -> HandlerResult {
                        let mut position = 0;
                        $(
                            let $arg = extract::<$arg>(args, position)?;
                            position += 1;
                        )*
                        (self)($($arg),*).into_result()
                    }),
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A1);
impl_into_handler!(A1, A2);
impl_into_handler!(A1, A2, A3);
impl_into_handler!(A1, A2, A3, A4);
impl_into_handler!(A1, A2, A3, A4, A5);
impl_into_handler!(A1, A2, A3, A4, A5, A6);
