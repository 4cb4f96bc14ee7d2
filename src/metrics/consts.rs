pub(crate) const HTTP_REQUEST_DURATION_SECS: &str =
    "anonymizer_http_request_duration_seconds";
pub(crate) const HTTP_REQUEST_SUCCESS: &str = "anonymizer_http_request_success";
pub(crate) const HTTP_REQUEST_FAILURE: &str = "anonymizer_http_request_failure";
pub(crate) const RATE_LIMIT_EXCEEDED: &str = "anonymizer_rate_limit_exceeded";
pub(crate) const TOR_CIRCUIT_ROTATIONS: &str = "anonymizer_tor_circuit_rotations";
