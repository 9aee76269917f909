//! Convert serde_json::Value to arguments the `Any` driver can bind.

use serde_json::Value;
use sqlx::any::AnyArguments;
use sqlx::Arguments;

/// A value that can be bound to a query on any installed driver.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl BindValue {
    /// Arrays and objects are bound as their JSON text.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else {
                    BindValue::F64(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => BindValue::String(v.to_string()),
        }
    }

    fn add_to<'q>(self, args: &mut AnyArguments<'q>) -> Result<(), sqlx::Error> {
        match self {
            BindValue::Null => args.add(Option::<String>::None),
            BindValue::Bool(b) => args.add(b),
            BindValue::I64(n) => args.add(n),
            BindValue::F64(n) => args.add(n),
            BindValue::String(s) => args.add(s),
        }
        .map_err(sqlx::Error::Encode)
    }
}

/// Build positional arguments (`$1`, `$2`, ...) in parameter order.
pub fn to_arguments<'q>(params: &[Value]) -> Result<AnyArguments<'q>, sqlx::Error> {
    let mut args = AnyArguments::default();
    for p in params {
        BindValue::from_json(p).add_to(&mut args)?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_keep_their_kind() {
        assert_eq!(BindValue::from_json(&json!(null)), BindValue::Null);
        assert_eq!(BindValue::from_json(&json!(true)), BindValue::Bool(true));
        assert_eq!(BindValue::from_json(&json!(42)), BindValue::I64(42));
        assert_eq!(BindValue::from_json(&json!(1.5)), BindValue::F64(1.5));
        assert_eq!(
            BindValue::from_json(&json!("web-01")),
            BindValue::String("web-01".into())
        );
    }

    #[test]
    fn composite_values_bind_as_json_text() {
        assert_eq!(
            BindValue::from_json(&json!(["a", "b"])),
            BindValue::String(r#"["a","b"]"#.into())
        );
    }
}
