//! Formatted logging through the global logger

/// Log a formatted message at Debug
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::global().sugar().debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::global().sugar().infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::global().sugar().warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::global().sugar().errorf(::std::format_args!($($arg)+))
    };
}

/// Evaluates to `Result<(), Fault>`
#[macro_export]
macro_rules! dpanicf {
    ($($arg:tt)+) => {
        $crate::global().sugar().dpanicf(::std::format_args!($($arg)+))
    };
}

/// Evaluates to a [`Fault`](crate::Fault)
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::global().sugar().panicf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::global().sugar().fatalf(::std::format_args!($($arg)+))
    };
}

/// Build an alternating key/value list for the `*w` methods.
///
/// ```
/// let kv = tierlog::kv!["user" => "ann", "attempt" => 2];
/// assert_eq!(kv.len(), 4);
/// ```
#[macro_export]
macro_rules! kv {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$(
            $crate::KeyValue::from($crate::__private::serde_json::json!($key)),
            $crate::KeyValue::from($crate::__private::serde_json::json!($value))
        ),*]
    };
}
