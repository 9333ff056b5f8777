/// Builds a credential-less [`Settings`](crate::settings::Settings) preset.
#[macro_export]
macro_rules! service_preset {
    ($api_type:expr, $name:expr, $endpoint:expr) => {
        $crate::settings::Settings {
            api_type: $api_type,
            name: String::from($name),
            endpoint: String::from($endpoint),
            username: None,
            password: None,
        }
    };
}
