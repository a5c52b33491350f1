/// Minimum spacing between two explorer requests issued by one sync run.
pub const REQUEST_INTERVAL_MS: u64 = 1_000;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_API_BASE_URL: &str = "https://beaconcha.in";
pub const API_VERSION_PATH: &str = "api/v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parts_join_cleanly() {
        assert!(!DEFAULT_API_BASE_URL.ends_with('/'));
        assert!(!API_VERSION_PATH.starts_with('/') && !API_VERSION_PATH.ends_with('/'));
    }
}
