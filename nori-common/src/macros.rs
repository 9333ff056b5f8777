/// Builds a `reqwest::Client` with the user agent of the given [`ApiType`](crate::ApiType).
///
/// Evaluates to `Result<Client, reqwest::Error>`.
#[macro_export]
macro_rules! client {
    ($x:expr) => {{
        $crate::reqwest::Client::builder()
            .user_agent($x.user_agent())
            .build()
    }};
}
