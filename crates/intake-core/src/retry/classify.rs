//! Classify failures (HTTP status, missing response, permanent errors) into retry kinds.

use super::error::FailureShape;

/// High-level classification of a failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received (connection reset, DNS, timeout).
    Connection,
    /// Server asked us to slow down (429).
    Throttled,
    /// Server-side failure (status >= 500).
    Http5xx(u16),
    /// Any other status, notably 4xx other than 429.
    Client(u16),
    /// The failure says a later attempt cannot succeed.
    Permanent,
}

impl ErrorKind {
    /// Whether the default policy retries this kind.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Throttled | ErrorKind::Http5xx(_)
        )
    }
}

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u16) -> ErrorKind {
    match code {
        429 => ErrorKind::Throttled,
        500..=u16::MAX => ErrorKind::Http5xx(code),
        _ => ErrorKind::Client(code),
    }
}

/// Classify a failure by the fields it exposes.
pub fn classify<E: FailureShape + ?Sized>(e: &E) -> ErrorKind {
    if e.is_permanent() {
        return ErrorKind::Permanent;
    }
    match e.response_status() {
        Some(code) => classify_http_status(code),
        None => ErrorKind::Connection,
    }
}

/// Default retryability: network errors, 5xx and 429 are retried.
///
/// An absent failure is never retried.
pub fn default_should_retry<E: FailureShape + ?Sized>(failure: Option<&E>) -> bool {
    failure.map_or(false, |e| classify(e).is_retryable())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Failure {
        status: Option<u16>,
        permanent: bool,
    }

    impl FailureShape for Failure {
        fn response_status(&self) -> Option<u16> {
            self.status
        }

        fn is_permanent(&self) -> bool {
            self.permanent
        }
    }

    fn with_status(status: u16) -> Failure {
        Failure {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn http_429_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert_eq!(classify_http_status(500), ErrorKind::Http5xx(500));
        assert_eq!(classify_http_status(503), ErrorKind::Http5xx(503));
        assert!(classify_http_status(599).is_retryable());
    }

    #[test]
    fn http_4xx_client() {
        assert_eq!(classify_http_status(404), ErrorKind::Client(404));
        assert_eq!(classify_http_status(400), ErrorKind::Client(400));
        assert!(!classify_http_status(401).is_retryable());
    }

    #[test]
    fn default_predicate_classification() {
        assert!(default_should_retry(Some(&with_status(503))));
        assert!(default_should_retry(Some(&with_status(429))));
        assert!(!default_should_retry(Some(&with_status(404))));
        assert!(default_should_retry(Some(&Failure::default())));
        assert!(!default_should_retry::<Failure>(None));
    }

    #[test]
    fn permanent_wins_over_status() {
        let f = Failure {
            status: Some(503),
            permanent: true,
        };
        assert_eq!(classify(&f), ErrorKind::Permanent);
        assert!(!default_should_retry(Some(&f)));
    }
}
