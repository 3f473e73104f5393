/// `Ok(())` when `$cond` holds, otherwise `Err($diagnostic)`.
macro_rules! require {
    ($cond:expr, $diagnostic:expr) => {
        match $cond {
            true => Ok(()),
            false => Err($diagnostic),
        }
    };
}
pub(crate) use require;
