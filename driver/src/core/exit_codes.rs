//! Planner exit codes.
//!
//! Codes below 10 mean a plan was found, 10-19 mean the task was proven
//! unsolvable or search gave up, 20-29 are resource limits and 30-39 are
//! unrecoverable failures.

/// Everything went fine.
pub const SUCCESS: i32 = 0;
/// A plan was found but memory ran out afterwards.
pub const SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY: i32 = 1;
/// A plan was found but time ran out afterwards.
pub const SEARCH_PLAN_FOUND_AND_OUT_OF_TIME: i32 = 2;
/// A plan was found but both memory and time ran out afterwards.
pub const SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY_AND_TIME: i32 = 3;

/// The translator proved the task unsolvable.
pub const TRANSLATE_UNSOLVABLE: i32 = 10;
/// Search proved the task unsolvable.
pub const SEARCH_UNSOLVABLE: i32 = 11;
/// An incomplete search exhausted its space without a plan.
pub const SEARCH_UNSOLVED_INCOMPLETE: i32 = 12;

/// The translator ran out of memory.
pub const TRANSLATE_OUT_OF_MEMORY: i32 = 20;
/// The translator ran out of time.
pub const TRANSLATE_OUT_OF_TIME: i32 = 21;
/// Search ran out of memory.
pub const SEARCH_OUT_OF_MEMORY: i32 = 22;
/// Search ran out of time.
pub const SEARCH_OUT_OF_TIME: i32 = 23;
/// Search ran out of memory and time.
pub const SEARCH_OUT_OF_MEMORY_AND_TIME: i32 = 24;

/// The translator crashed.
pub const TRANSLATE_CRITICAL_ERROR: i32 = 30;
/// The translator rejected its input.
pub const TRANSLATE_INPUT_ERROR: i32 = 31;
/// Search crashed.
pub const SEARCH_CRITICAL_ERROR: i32 = 32;
/// Search rejected its input.
pub const SEARCH_INPUT_ERROR: i32 = 33;
/// Search was asked for an unsupported feature.
pub const SEARCH_UNSUPPORTED: i32 = 34;
/// The driver itself failed.
pub const DRIVER_CRITICAL_ERROR: i32 = 35;
/// The driver rejected its request.
pub const DRIVER_INPUT_ERROR: i32 = 36;
/// The driver was asked for an unsupported feature.
pub const DRIVER_UNSUPPORTED: i32 = 37;

/// Returns true for codes that signal an unrecoverable failure.
#[must_use]
pub const fn is_unrecoverable(code: i32) -> bool {
    30 <= code && code < 40
}

/// Returns true if the code reports that at least one plan was written.
#[must_use]
pub const fn plan_found(code: i32) -> bool {
    0 <= code && code < 10
}

/// Returns the symbolic name of a known exit code.
#[must_use]
pub const fn describe(code: i32) -> Option<&'static str> {
    let name = match code {
        SUCCESS => "SUCCESS",
        SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY => "SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY",
        SEARCH_PLAN_FOUND_AND_OUT_OF_TIME => "SEARCH_PLAN_FOUND_AND_OUT_OF_TIME",
        SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY_AND_TIME => {
            "SEARCH_PLAN_FOUND_AND_OUT_OF_MEMORY_AND_TIME"
        }
        TRANSLATE_UNSOLVABLE => "TRANSLATE_UNSOLVABLE",
        SEARCH_UNSOLVABLE => "SEARCH_UNSOLVABLE",
        SEARCH_UNSOLVED_INCOMPLETE => "SEARCH_UNSOLVED_INCOMPLETE",
        TRANSLATE_OUT_OF_MEMORY => "TRANSLATE_OUT_OF_MEMORY",
        TRANSLATE_OUT_OF_TIME => "TRANSLATE_OUT_OF_TIME",
        SEARCH_OUT_OF_MEMORY => "SEARCH_OUT_OF_MEMORY",
        SEARCH_OUT_OF_TIME => "SEARCH_OUT_OF_TIME",
        SEARCH_OUT_OF_MEMORY_AND_TIME => "SEARCH_OUT_OF_MEMORY_AND_TIME",
        TRANSLATE_CRITICAL_ERROR => "TRANSLATE_CRITICAL_ERROR",
        TRANSLATE_INPUT_ERROR => "TRANSLATE_INPUT_ERROR",
        SEARCH_CRITICAL_ERROR => "SEARCH_CRITICAL_ERROR",
        SEARCH_INPUT_ERROR => "SEARCH_INPUT_ERROR",
        SEARCH_UNSUPPORTED => "SEARCH_UNSUPPORTED",
        DRIVER_CRITICAL_ERROR => "DRIVER_CRITICAL_ERROR",
        DRIVER_INPUT_ERROR => "DRIVER_INPUT_ERROR",
        DRIVER_UNSUPPORTED => "DRIVER_UNSUPPORTED",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecoverable_range() {
        assert!(!is_unrecoverable(SEARCH_UNSOLVED_INCOMPLETE));
        assert!(!is_unrecoverable(SEARCH_OUT_OF_TIME));
        assert!(is_unrecoverable(TRANSLATE_CRITICAL_ERROR));
        assert!(is_unrecoverable(DRIVER_UNSUPPORTED));
        assert!(!is_unrecoverable(40));
    }

    #[test]
    fn test_plan_found_range() {
        assert!(plan_found(SUCCESS));
        assert!(plan_found(SEARCH_PLAN_FOUND_AND_OUT_OF_TIME));
        assert!(!plan_found(SEARCH_UNSOLVABLE));
        assert!(!plan_found(-9));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(SEARCH_UNSOLVED_INCOMPLETE), Some("SEARCH_UNSOLVED_INCOMPLETE"));
        assert_eq!(describe(DRIVER_INPUT_ERROR), Some("DRIVER_INPUT_ERROR"));
        assert_eq!(describe(99), None);
    }
}
