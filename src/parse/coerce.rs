use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde_json::Value;

/// Converts a parsed JSON value into BSON. Integral numbers become `Int32`
/// when they fit, else `Int64`; everything else maps structurally.
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if let Ok(small) = i32::try_from(i) {
                    Bson::Int32(small)
                } else {
                    Bson::Int64(i)
                }
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (k, v) in map {
                doc.insert(k.clone(), json_to_bson(v));
            }
            Bson::Document(doc)
        }
    }
}

/// Rewrites recognized sentinel shapes into typed values:
/// `{"$oid": s}` becomes an `ObjectId`, `{"$date": s|n}` becomes a
/// `DateTime` (ISO-8601 string or epoch milliseconds), and any bare
/// 24-hex-character string becomes an `ObjectId` regardless of the key it
/// sits under. Everything else is rebuilt with children coerced.
///
/// Total and idempotent: unrecognized or malformed sentinels pass through
/// unchanged, and already-typed values are never rewritten again.
#[must_use]
pub fn coerce(value: Bson) -> Bson {
    match value {
        Bson::Document(doc) => coerce_document(doc),
        Bson::Array(items) => Bson::Array(items.into_iter().map(coerce).collect()),
        Bson::String(s) => coerce_string(s),
        other => other,
    }
}

fn coerce_document(doc: Document) -> Bson {
    if doc.len() == 1 {
        if let Some(Bson::String(s)) = doc.get("$oid")
            && let Ok(oid) = ObjectId::parse_str(s)
        {
            return Bson::ObjectId(oid);
        }
        if let Some(stamp) = doc.get("$date").and_then(parse_date) {
            return Bson::DateTime(stamp);
        }
    }
    let mut out = Document::new();
    for (k, v) in doc {
        out.insert(k, coerce(v));
    }
    Bson::Document(out)
}

fn coerce_string(s: String) -> Bson {
    if s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        if let Ok(oid) = ObjectId::parse_str(&s) {
            return Bson::ObjectId(oid);
        }
    }
    Bson::String(s)
}

fn parse_date(value: &Bson) -> Option<bson::DateTime> {
    let millis = match value {
        Bson::String(s) => chrono::DateTime::parse_from_rfc3339(s).ok()?.timestamp_millis(),
        Bson::Int32(n) => i64::from(*n),
        Bson::Int64(n) => *n,
        Bson::Double(f) if f.is_finite() => *f as i64,
        _ => return None,
    };
    Some(bson::DateTime::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn oid_sentinel_becomes_object_id() {
        let v = coerce(Bson::Document(doc! {"$oid": "507f1f77bcf86cd799439011"}));
        assert!(matches!(v, Bson::ObjectId(_)));
    }

    #[test]
    fn malformed_oid_sentinel_passes_through() {
        let v = coerce(Bson::Document(doc! {"$oid": "not-hex"}));
        assert_eq!(v, Bson::Document(doc! {"$oid": "not-hex"}));
    }

    #[test]
    fn date_from_epoch_millis() {
        let v = coerce(Bson::Document(doc! {"$date": 1_700_000_000_000i64}));
        assert_eq!(v, Bson::DateTime(bson::DateTime::from_millis(1_700_000_000_000)));
    }
}
