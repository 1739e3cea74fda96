use crate::error::ApiError;

/// Bounded retry for transport failures. `max_retries` counts attempts
/// after the first, so `{ max_retries: 3 }` allows four calls in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl RetryPolicy {
    pub const NONE: RetryPolicy = RetryPolicy { max_retries: 0 };
}

/// Per-operation failure policy. The table below is asymmetric on purpose:
/// profile loads dedupe but never retry, contact mutations retry but never
/// dedupe. Changing an entry changes user-visible behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPolicy {
    /// When true, a load already in flight is not reissued.
    pub dedupe_in_flight: bool,
    pub retry: RetryPolicy,
}

pub const PROFILE_LOAD: OperationPolicy = OperationPolicy {
    dedupe_in_flight: true,
    retry: RetryPolicy::NONE,
};

pub const PROFILE_EDIT: OperationPolicy = OperationPolicy {
    dedupe_in_flight: false,
    retry: RetryPolicy::NONE,
};

pub const CONTACT_LIST: OperationPolicy = OperationPolicy {
    dedupe_in_flight: false,
    retry: RetryPolicy::NONE,
};

pub const CONTACT_MUTATION: OperationPolicy = OperationPolicy {
    dedupe_in_flight: false,
    retry: RetryPolicy { max_retries: 3 },
};

pub const HISTORY_LOAD: OperationPolicy = OperationPolicy {
    dedupe_in_flight: false,
    retry: RetryPolicy::NONE,
};

pub const RECOGNIZE: OperationPolicy = OperationPolicy {
    dedupe_in_flight: false,
    retry: RetryPolicy::NONE,
};

/// Runs `op`, retrying network-class failures up to the policy's bound.
/// Auth, validation, and server errors surface immediately.
pub fn run_with_retry<T>(
    retry: RetryPolicy,
    mut op: impl FnMut() -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut retries = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && retries < retry.max_retries => retries += 1,
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn network() -> ApiError {
        ApiError::Network("connection refused".into())
    }

    #[test]
    fn success_on_second_retry_surfaces_no_error() {
        let mut calls = 0;
        let result = run_with_retry(CONTACT_MUTATION.retry, || {
            calls += 1;
            if calls < 3 {
                Err(network())
            } else {
                Ok("added")
            }
        });
        assert_eq!(result, Ok("added"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn network_failures_stop_after_three_retries() {
        let mut calls = 0;
        let result = run_with_retry(CONTACT_MUTATION.retry, || -> Result<(), ApiError> {
            calls += 1;
            Err(network())
        });
        assert_eq!(result, Err(network()));
        assert_eq!(calls, 4);
    }

    #[test]
    fn non_network_failures_are_never_retried() {
        let mut calls = 0;
        let result = run_with_retry(CONTACT_MUTATION.retry, || -> Result<(), ApiError> {
            calls += 1;
            Err(ApiError::Validation("contact_value required".into()))
        });
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(calls, 1);

        let mut calls = 0;
        let result = run_with_retry(CONTACT_MUTATION.retry, || -> Result<(), ApiError> {
            calls += 1;
            Err(ApiError::Auth {
                status: 401,
                message: "expired".into(),
            })
        });
        assert!(matches!(result, Err(ApiError::Auth { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn none_policy_gives_a_single_attempt() {
        let mut calls = 0;
        let _ = run_with_retry(PROFILE_LOAD.retry, || -> Result<(), ApiError> {
            calls += 1;
            Err(network())
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn policy_table_keeps_source_asymmetry() {
        assert!(PROFILE_LOAD.dedupe_in_flight);
        assert_eq!(PROFILE_LOAD.retry, RetryPolicy::NONE);
        assert!(!CONTACT_MUTATION.dedupe_in_flight);
        assert_eq!(CONTACT_MUTATION.retry.max_retries, 3);
        assert!(!CONTACT_LIST.dedupe_in_flight);
        assert!(!HISTORY_LOAD.dedupe_in_flight);
    }
}
