use serde_json::Value;

use super::format_value;

/// Headline field of each command, in lookup order.
const PRIORITY_KEYS: [&str; 15] = [
    "price",
    "taylor_rate",
    "wacc",
    "npv",
    "payment",
    "quantity",
    "forward_price",
    "expected_return",
    "output_received",
    "max_supply",
    "life_expectancy",
    "ruin_probability",
    "query",
    "status",
    "indicators",
];

/// Print just the key answer value from the output.
///
/// Looks for a headline field in the result (one level of nesting deep,
/// for results such as the AMM trade), then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_value(result_obj, "null"));
        return;
    };

    let nested = map.values().filter_map(Value::as_object);
    for scope in std::iter::once(map).chain(nested) {
        for key in PRIORITY_KEYS {
            if let Some(val) = scope.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_value(val, "null"));
                return;
            }
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_value(val, "null"));
    }
}
