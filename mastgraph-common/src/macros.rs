//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `MastGraphError`
///
/// Allows early returns with custom error messages.
///
/// # Examples
///
/// ```rust
/// use mastgraph_common::bail;
/// use mastgraph_common::Result;
///
/// fn check_value(value: i32) -> Result<()> {
///     if value < 0 {
///         bail!("Value cannot be negative: {}", value);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::MastGraphError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::MastGraphError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::MastGraphError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but for `MastGraphError`
///
/// Checks a condition and returns an error if it's false.
///
/// # Examples
///
/// ```rust
/// use mastgraph_common::ensure;
/// use mastgraph_common::Result;
///
/// fn validate_positive(value: i32) -> Result<()> {
///     ensure!(value > 0, "Value must be positive, got: {}", value);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::MastGraphError::new($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::MastGraphError::new($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::MastGraphError::new(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use mastgraph_common::{with_context, Result};
///
/// fn read_settings() -> Result<String> {
///     std::fs::read_to_string("config.yaml")
///         .map_err(|e| with_context!(e, "Failed to read configuration file"))
/// }
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::MastGraphError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::MastGraphError::with_source(format!($fmt, $($arg)*), $err)
    };
}

/// Wrap a fallible expression with error context
///
/// # Examples
///
/// ```rust
/// use mastgraph_common::{result_with_context, Result};
///
/// fn load_file(path: &str) -> Result<String> {
///     result_with_context!(
///         std::fs::read_to_string(path),
///         "Failed to read file"
///     )
/// }
/// ```
#[macro_export]
macro_rules! result_with_context {
    ($expr:expr, $msg:literal $(,)?) => {
        $expr.map_err(|e| $crate::with_context!(e, $msg))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        $expr.map_err(|e| $crate::with_context!(e, $fmt, $($arg)*))
    };
}
