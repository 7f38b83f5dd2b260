#[macro_export]
macro_rules! assert_serializes_to {
    ($value:expr, $json_string:expr$(,)?) => {
        match (&$value, $json_string) {
            (value, json_string) => {
                let left = serde_json::to_value(value)
                    .unwrap_or_else(|e|
                        panic!("failed to serialize \"{:?}\": {e}", value)
                    );
                let right: serde_json::Value = serde_json
                    ::from_str(json_string.as_ref())
                    .unwrap_or_else(|e|
                        panic!("invalid expected json \"{}\": {e}", json_string)
                    );
                assert_eq!(left, right, "serialized form of {:?}", value);
            }
        }
    };
}
