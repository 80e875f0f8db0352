//! Field introspection for search filters
//!
//! `Search` and `SearchField` stand in for runtime reflection: the derive
//! macro lists a struct's fields as [`SearchSite`]s, and every field type
//! describes its current value through a [`FieldView`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    /// Bound to a single `(?)` and expanded to one placeholder per element
    List(Vec<SqlValue>),
}

impl SqlValue {
    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(v) => !v,
            Self::Int(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Text(v) => v.is_empty(),
            Self::Timestamp(v) => *v == NaiveDateTime::default(),
            Self::List(v) => v.is_empty(),
        }
    }

    /// Text used when the value is embedded in a LIKE pattern
    pub fn to_pattern_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::Timestamp(v) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::List(v) => v
                .iter()
                .map(Self::to_pattern_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

/// Current value of a field, as seen by the resolver
pub enum FieldView<'a> {
    Null,
    Scalar(SqlValue),
    List(Vec<SqlValue>),
    Struct(&'a dyn Search),
    StructList(Vec<&'a dyn Search>),
}

impl FieldView<'_> {
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Scalar(v) => v.is_zero(),
            Self::List(v) => v.is_empty(),
            Self::Struct(s) => is_zero_search(*s),
            Self::StructList(v) => v.is_empty(),
        }
    }

    /// Short description of the view's shape, used in diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::StructList(_) => "list of structs",
        }
    }
}

/// A field type that can carry a search directive
pub trait SearchField {
    fn view(&self) -> FieldView<'_>;

    fn is_zero(&self) -> bool {
        self.view().is_zero()
    }
}

/// One field of a search struct, in declaration order
pub enum SearchSite<'a> {
    /// Field without a directive; recursed into
    Nested {
        field: &'static str,
        value: &'a dyn Search,
    },
    /// Field marked with the exclusion directive
    Skipped { field: &'static str },
    /// Field with a directive
    Tagged {
        field: &'static str,
        tag: &'static str,
        value: &'a dyn SearchField,
    },
}

/// A struct whose fields describe query conditions
///
/// Implemented with `#[derive(Search)]`.
pub trait Search {
    /// Struct name, for diagnostics
    fn search_name(&self) -> &'static str;

    /// Fields in declaration order
    fn search_fields(&self) -> Vec<SearchSite<'_>>;
}

/// A struct is zero when every nested and tagged field is zero
pub fn is_zero_search(search: &dyn Search) -> bool {
    search.search_fields().iter().all(|site| match site {
        SearchSite::Nested { value, .. } => is_zero_search(*value),
        SearchSite::Skipped { .. } => true,
        SearchSite::Tagged { value, .. } => value.is_zero(),
    })
}

impl SearchField for String {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Text(self.clone()))
    }
}

impl SearchField for bool {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Bool(*self))
    }
}

macro_rules! impl_search_field_int {
    ($($ty:ty),*) => {
        $(
            impl SearchField for $ty {
                fn view(&self) -> FieldView<'_> {
                    FieldView::Scalar(SqlValue::Int(i64::from(*self)))
                }
            }
        )*
    };
}

impl_search_field_int!(i8, i16, i32, i64, u8, u16, u32);

impl SearchField for f32 {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Float(f64::from(*self)))
    }
}

impl SearchField for f64 {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Float(*self))
    }
}

impl SearchField for NaiveDateTime {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Timestamp(*self))
    }
}

impl SearchField for NaiveDate {
    fn view(&self) -> FieldView<'_> {
        FieldView::Scalar(SqlValue::Timestamp(self.and_time(chrono::NaiveTime::MIN)))
    }

    fn is_zero(&self) -> bool {
        *self == NaiveDate::default()
    }
}

/// `Some(v)` is never zero, so `Option` expresses filters on zero values
impl<T: SearchField> SearchField for Option<T> {
    fn view(&self) -> FieldView<'_> {
        match self {
            Some(v) => v.view(),
            None => FieldView::Null,
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: SearchField> SearchField for Vec<T> {
    fn view(&self) -> FieldView<'_> {
        let mut scalars = Vec::new();
        let mut structs = Vec::new();
        for item in self {
            match item.view() {
                FieldView::Scalar(v) => scalars.push(v),
                FieldView::Struct(s) => structs.push(s),
                FieldView::List(v) => scalars.push(SqlValue::List(v)),
                FieldView::Null => scalars.push(SqlValue::Null),
                FieldView::StructList(v) => structs.extend(v),
            }
        }
        if structs.is_empty() {
            FieldView::List(scalars)
        } else {
            FieldView::StructList(structs)
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: String,
        right: Option<i32>,
    }

    impl Search for Pair {
        fn search_name(&self) -> &'static str {
            "Pair"
        }

        fn search_fields(&self) -> Vec<SearchSite<'_>> {
            vec![
                SearchSite::Tagged {
                    field: "left",
                    tag: "type:exact;column:left;table:t",
                    value: &self.left,
                },
                SearchSite::Tagged {
                    field: "right",
                    tag: "type:exact;column:right;table:t",
                    value: &self.right,
                },
            ]
        }
    }

    impl SearchField for Pair {
        fn view(&self) -> FieldView<'_> {
            FieldView::Struct(self)
        }
    }

    #[test]
    fn test_scalar_zero_values() {
        assert!(String::new().is_zero());
        assert!(!"x".to_string().is_zero());
        assert!(0i32.is_zero());
        assert!(!5i64.is_zero());
        assert!(0.0f64.is_zero());
        assert!(false.is_zero());
        assert!(!true.is_zero());
    }

    #[test]
    fn test_option_is_zero_only_when_none() {
        assert!(None::<i32>.is_zero());
        assert!(!Some(0i32).is_zero());
        assert!(!Some(String::new()).is_zero());
    }

    #[test]
    fn test_vec_views() {
        let ids = vec![1i64, 2, 3];
        match ids.view() {
            FieldView::List(values) => {
                assert_eq!(
                    values,
                    vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
                );
            }
            other => panic!("unexpected shape: {}", other.shape()),
        }
        assert!(Vec::<i64>::new().is_zero());

        let pairs = vec![Pair {
            left: "a".to_string(),
            right: None,
        }];
        assert_eq!(pairs.view().shape(), "list of structs");
    }

    #[test]
    fn test_struct_zero() {
        let empty = Pair {
            left: String::new(),
            right: None,
        };
        assert!(empty.is_zero());

        let set = Pair {
            left: String::new(),
            right: Some(0),
        };
        assert!(!set.is_zero());
    }

    #[test]
    fn test_pattern_text() {
        assert_eq!(SqlValue::from("abc").to_pattern_text(), "abc");
        assert_eq!(SqlValue::Int(42).to_pattern_text(), "42");
        assert_eq!(SqlValue::Null.to_pattern_text(), "");
    }

    #[test]
    fn test_serialize_untagged() {
        let value = SqlValue::List(vec![SqlValue::Int(1), SqlValue::from("a")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"a"]"#);
    }
}
