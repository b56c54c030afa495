//! DTO binding seam.
//!
//! The [`FromParams`] trait lets request DTOs build themselves from a parsed
//! [`RequestParams`] store.

use crate::{ParamError, RequestParams};

/// Trait for types that can be built from a request's parameters.
///
/// # Implementing `FromParams`
///
/// ```rust
/// use hermes_params::{FromParams, ParamError, RequestParams};
///
/// struct Page {
///     offset: i32,
///     limit: i32,
/// }
///
/// impl FromParams for Page {
///     fn from_params(params: &RequestParams) -> Result<Self, ParamError> {
///         Ok(Page {
///             offset: params.get_as_int_or("offset", 0, i32::MAX, 0)?,
///             limit: params.get_as_int_or("limit", 1, 100, 20)?,
///         })
///     }
/// }
/// ```
///
/// Tuples of `FromParams` types are `FromParams` themselves, and wrapping a
/// type in `Option` or `Result` makes its binding failure observable instead
/// of fatal.
pub trait FromParams: Sized {
    /// Builds this type from the parameter store.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] if a required parameter is missing or invalid.
    fn from_params(params: &RequestParams) -> Result<Self, ParamError>;
}

impl<T: FromParams> FromParams for Option<T> {
    fn from_params(params: &RequestParams) -> Result<Self, ParamError> {
        Ok(T::from_params(params).ok())
    }
}

impl<T: FromParams> FromParams for Result<T, ParamError> {
    fn from_params(params: &RequestParams) -> Result<Self, ParamError> {
        Ok(T::from_params(params))
    }
}

macro_rules! impl_from_params_for_tuple {
    ($($T:ident),*) => {
        impl<$($T: FromParams),*> FromParams for ($($T,)*) {
            fn from_params(params: &RequestParams) -> Result<Self, ParamError> {
                Ok(($($T::from_params(params)?,)*))
            }
        }
    };
}

impl_from_params_for_tuple!(T1);
impl_from_params_for_tuple!(T1, T2);
impl_from_params_for_tuple!(T1, T2, T3);
impl_from_params_for_tuple!(T1, T2, T3, T4);
impl_from_params_for_tuple!(T1, T2, T3, T4, T5);
impl_from_params_for_tuple!(T1, T2, T3, T4, T5, T6);
impl_from_params_for_tuple!(T1, T2, T3, T4, T5, T6, T7);
impl_from_params_for_tuple!(T1, T2, T3, T4, T5, T6, T7, T8);

impl FromParams for () {
    fn from_params(_params: &RequestParams) -> Result<Self, ParamError> {
        Ok(())
    }
}
