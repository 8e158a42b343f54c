//! Error context for `anyhow` in `map_err` position.
//!
//! `.map_err(ctx!("running {cmd}"))` is the same as
//! `.with_context(|| format!("running {cmd}"))`, but reads better in
//! long method chains and works for any `std::error::Error` type.

#[macro_export]
macro_rules! ctx {
    ($fmt:tt) => {
        |e| anyhow::Context::context(Result::<(), _>::Err(e), format!($fmt))
            .err().unwrap()
    };
    ($fmt:tt, $($arg:tt)*) => {
        |e| anyhow::Context::context(Result::<(), _>::Err(e), format!($fmt, $($arg)*))
            .err().unwrap()
    };
}
