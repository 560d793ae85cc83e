//! Codificación de parámetros
//!
//! Convierte parámetros JSON en query strings / cuerpos
//! `application/x-www-form-urlencoded`. Los objetos y listas anidados se
//! aplanan con notación de corchetes (`a[b]=1`, `lista[0]=x`).

use serde_json::Value;

/// Codificar parámetros como `clave=valor&...`
///
/// Un parámetro raíz que no sea objeto ni lista no tiene claves y produce
/// una cadena vacía.
pub fn encode_form(params: &Value) -> String {
    let mut pairs = Vec::new();

    match params {
        Value::Object(map) => {
            for (key, value) in map {
                collect_pairs(key, value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                collect_pairs(&index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(&key), urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn collect_pairs(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((prefix.to_string(), if *flag { "1" } else { "0" }.to_string())),
        Value::Number(number) => pairs.push((prefix.to_string(), number.to_string())),
        Value::String(text) => pairs.push((prefix.to_string(), text.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_pairs(&format!("{}[{}]", prefix, index), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                collect_pairs(&format!("{}[{}]", prefix, key), item, pairs);
            }
        }
    }
}
