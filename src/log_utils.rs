pub use log::debug;

/// Log a debug message if either:
/// (1) the global debug log level is active (from the --debug option), or
/// (2) the local debug flag given as the first argument is set
///
/// With the local flag set the message goes straight to stderr, so it can be enabled for a single
/// clustering routine without raising the log level for the whole run.
///
/// # Examples
///
/// ```ignore
/// let debug = false;
/// debug_msg!(debug, "merging cluster {} into {}", i, j);
/// ```
macro_rules! debug_msg {
    ($flag:expr, $($arg:tt)+) => {
        if $flag {
            eprintln!($($arg)+);
        } else {
            $crate::log_utils::debug!($($arg)+);
        }
    }
}

pub(crate) use debug_msg;
