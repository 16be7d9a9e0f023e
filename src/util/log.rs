use std::sync::atomic::{AtomicUsize, Ordering};

pub const LEVEL_ERROR: usize = 1;
pub const LEVEL_WARN: usize = 2;
pub const LEVEL_INFO: usize = 3;
pub const LEVEL_DEBUG: usize = 4;

static LOG_LEVEL: AtomicUsize = AtomicUsize::new(LEVEL_INFO);

pub fn set_level(level: usize) {
    LOG_LEVEL.store(level, Ordering::Relaxed);
}

#[inline]
pub fn is_enabled(level: usize) -> bool {
    level <= LOG_LEVEL.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        if $crate::util::log::is_enabled($crate::util::log::LEVEL_ERROR) {
            eprintln!(
                "[ERROR]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::util::log::is_enabled($crate::util::log::LEVEL_WARN) {
            eprintln!(
                "[WARN]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::util::log::is_enabled($crate::util::log::LEVEL_INFO) {
            eprintln!(
                "[INFO]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::util::log::is_enabled($crate::util::log::LEVEL_DEBUG) {
            eprintln!(
                "[DEBUG]({}:{}) {}",
                file!(),
                line!(),
                format_args!($($arg)*)
            )
        }
    };
}
