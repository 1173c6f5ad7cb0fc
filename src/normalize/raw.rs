//! Typed access to raw ad-library items.
//!
//! Raw items arrive from the scrape provider as arbitrarily shaped JSON. Every
//! field lookup goes through a JSON pointer and yields an `Option`, so a
//! missing object anywhere along the path is indistinguishable from a missing
//! leaf. Fields with several possible sources are described as an ordered
//! list of pointers and resolved with [`RawAdItem::first_text`].

use serde_json::Value;

/// A borrowed view over one raw ad-library object.
#[derive(Debug, Clone, Copy)]
pub struct RawAdItem<'a> {
    value: &'a Value,
}

impl<'a> RawAdItem<'a> {
    /// Wrap a raw entry. Returns `None` for anything that is not a JSON object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.is_object().then_some(Self { value })
    }

    /// The untouched raw value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Look up a non-null value by JSON pointer.
    pub fn get(&self, pointer: &str) -> Option<&'a Value> {
        self.value.pointer(pointer).filter(|v| !v.is_null())
    }

    /// Non-empty text at `pointer`. Numbers are rendered as text so numeric
    /// identifiers survive.
    pub fn text(&self, pointer: &str) -> Option<String> {
        match self.get(pointer)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First non-empty text among `pointers`, tried in order.
    pub fn first_text(&self, pointers: &[&str]) -> Option<String> {
        pointers.iter().find_map(|p| self.text(p))
    }

    /// Finite number at `pointer`, accepting numeric strings.
    pub fn number(&self, pointer: &str) -> Option<f64> {
        let n = match self.get(pointer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    /// Loose truthiness: `false`, `0`, `""` and absence are false.
    pub fn flag(&self, pointer: &str) -> bool {
        match self.get(pointer) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Length of the array at `pointer`, if it is an array.
    pub fn array_len(&self, pointer: &str) -> Option<usize> {
        self.get(pointer)?.as_array().map(Vec::len)
    }

    /// Scalar entries of the array at `pointer` rendered as text.
    pub fn text_list(&self, pointer: &str) -> Vec<String> {
        let Some(items) = self.get(pointer).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_non_objects() {
        assert!(RawAdItem::new(&json!("ad")).is_none());
        assert!(RawAdItem::new(&json!([1, 2])).is_none());
        assert!(RawAdItem::new(&Value::Null).is_none());
        assert!(RawAdItem::new(&json!({})).is_some());
    }

    #[test]
    fn test_text_skips_empty_and_null() {
        let raw = json!({"a": "", "b": null, "c": "x", "d": 42});
        let item = RawAdItem::new(&raw).unwrap();
        assert_eq!(item.text("/a"), None);
        assert_eq!(item.text("/b"), None);
        assert_eq!(item.text("/c").as_deref(), Some("x"));
        assert_eq!(item.text("/d").as_deref(), Some("42"));
        assert_eq!(item.first_text(&["/a", "/b", "/missing", "/c"]).as_deref(), Some("x"));
    }

    #[test]
    fn test_nested_missing_paths() {
        let raw = json!({"snapshot": {"cards": []}});
        let item = RawAdItem::new(&raw).unwrap();
        assert_eq!(item.text("/snapshot/cards/0/video_hd_url"), None);
        assert_eq!(item.text("/snapshot/videos/0/video_hd_url"), None);
        assert_eq!(item.array_len("/snapshot/cards"), Some(0));
    }

    #[test]
    fn test_flag_truthiness() {
        let raw = json!({"t": true, "f": false, "one": 1, "zero": 0, "s": "yes", "e": ""});
        let item = RawAdItem::new(&raw).unwrap();
        assert!(item.flag("/t"));
        assert!(!item.flag("/f"));
        assert!(item.flag("/one"));
        assert!(!item.flag("/zero"));
        assert!(item.flag("/s"));
        assert!(!item.flag("/e"));
        assert!(!item.flag("/missing"));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let raw = json!({"n": 3600, "s": "7200", "bad": "soon"});
        let item = RawAdItem::new(&raw).unwrap();
        assert_eq!(item.number("/n"), Some(3600.0));
        assert_eq!(item.number("/s"), Some(7200.0));
        assert_eq!(item.number("/bad"), None);
    }

    #[test]
    fn test_text_list() {
        let raw = json!({"p": ["FACEBOOK", "INSTAGRAM", null, ""]});
        let item = RawAdItem::new(&raw).unwrap();
        assert_eq!(item.text_list("/p"), vec!["FACEBOOK", "INSTAGRAM"]);
        assert!(item.text_list("/missing").is_empty());
    }
}
