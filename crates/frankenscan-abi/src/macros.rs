//! Helper macros for ABI function generation.
//!
//! Provides the `abi_fn!` macro that generates `#[unsafe(no_mangle)] pub unsafe extern "C" fn`
//! wrappers around a body that runs inside an `unsafe` block.

/// Generate an exported extern "C" function.
///
/// # Usage
///
/// ```ignore
/// abi_fn! {
///     /// Doc comment for the function.
///     fn my_func(arg1: Type1, arg2: Type2) -> ReturnType {
///         // implementation body
///     }
/// }
/// ```
///
/// Pointer checks and healing live in the body so each entry point can decide
/// how to treat its own arguments.
macro_rules! abi_fn {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            unsafe { $body }
        }
    };
}

pub(crate) use abi_fn;
