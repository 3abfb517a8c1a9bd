/// Checks that a numerical value is in the closed interval `[a,b]`, returning
/// [`Error::Config`](crate::error::Error::Config) from the enclosing function with a
/// helpful message if not
///
/// `NaN` is never in any interval.
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::Config(format!(
                "Invalid value for `{}`: {}. Must be in the interval [{}, {}].",
                stringify!($var),
                $var,
                $a,
                $b,
            )));
        }
    };
}

/// Checks an arbitrary configuration condition, returning
/// [`Error::Config`](crate::error::Error::Config) with the formatted message if it fails
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::Config(format!($($arg)+)));
        }
    };
}
