//! Result shape descriptors.
//!
//! Rust has no runtime reflection, so a tool declares the shape of its result
//! up front. The cost estimator reads the descriptor instead of inspecting
//! types at runtime. [`DescribeShape`] lets authors derive the descriptor
//! from the Rust type they actually return:
//!
//! ```
//! use governor_domain::tool::shape::{DescribeShape, ResultShape};
//!
//! struct Hit;
//! impl DescribeShape for Hit {
//!     fn shape() -> ResultShape {
//!         ResultShape::record("Hit", 4, 0)
//!     }
//! }
//!
//! assert!(matches!(Vec::<Hit>::shape(), ResultShape::Collection { .. }));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Declared shape of a tool result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultShape {
    Boolean,
    Number,
    Text,
    Date,
    /// A structured type with a known number of properties and methods.
    Record {
        name: String,
        properties: usize,
        methods: usize,
    },
    /// A homogeneous collection of items.
    Collection { item: Box<ResultShape> },
    /// Nothing is known about the shape.
    #[default]
    Opaque,
}

impl ResultShape {
    pub fn record(name: impl Into<String>, properties: usize, methods: usize) -> Self {
        ResultShape::Record {
            name: name.into(),
            properties,
            methods,
        }
    }

    pub fn collection_of(item: ResultShape) -> Self {
        ResultShape::Collection {
            item: Box::new(item),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ResultShape::Collection { .. })
    }

    /// Whether the shape's name marks it as a response/result envelope.
    pub fn is_envelope(&self) -> bool {
        match self {
            ResultShape::Record { name, .. } => {
                let lower = name.to_ascii_lowercase();
                lower.contains("response") || lower.contains("result")
            }
            _ => false,
        }
    }
}

/// Static shape description for a result type.
pub trait DescribeShape {
    fn shape() -> ResultShape;
}

macro_rules! describe_as {
    ($shape:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl DescribeShape for $ty {
                fn shape() -> ResultShape {
                    $shape
                }
            }
        )+
    };
}

describe_as!(ResultShape::Boolean => bool);
describe_as!(ResultShape::Number => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
describe_as!(ResultShape::Text => String, str, char);
describe_as!(ResultShape::Opaque => serde_json::Value, ());

impl<T: DescribeShape + ?Sized> DescribeShape for &T {
    fn shape() -> ResultShape {
        T::shape()
    }
}

impl<T: DescribeShape> DescribeShape for Option<T> {
    fn shape() -> ResultShape {
        T::shape()
    }
}

impl<T: DescribeShape> DescribeShape for Box<T> {
    fn shape() -> ResultShape {
        T::shape()
    }
}

impl<T: DescribeShape> DescribeShape for Vec<T> {
    fn shape() -> ResultShape {
        ResultShape::collection_of(T::shape())
    }
}

impl<T: DescribeShape> DescribeShape for [T] {
    fn shape() -> ResultShape {
        ResultShape::collection_of(T::shape())
    }
}

impl<T: DescribeShape, S> DescribeShape for HashSet<T, S> {
    fn shape() -> ResultShape {
        ResultShape::collection_of(T::shape())
    }
}

impl<T: DescribeShape> DescribeShape for BTreeSet<T> {
    fn shape() -> ResultShape {
        ResultShape::collection_of(T::shape())
    }
}

impl<K, V: DescribeShape, S> DescribeShape for HashMap<K, V, S> {
    fn shape() -> ResultShape {
        ResultShape::collection_of(V::shape())
    }
}

impl<K, V: DescribeShape> DescribeShape for BTreeMap<K, V> {
    fn shape() -> ResultShape {
        ResultShape::collection_of(V::shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SearchResponse;

    impl DescribeShape for SearchResponse {
        fn shape() -> ResultShape {
            ResultShape::record("SearchResponse", 3, 1)
        }
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(bool::shape(), ResultShape::Boolean);
        assert_eq!(u64::shape(), ResultShape::Number);
        assert_eq!(String::shape(), ResultShape::Text);
        assert_eq!(<&str>::shape(), ResultShape::Text);
        assert_eq!(Option::<f64>::shape(), ResultShape::Number);
        assert_eq!(serde_json::Value::shape(), ResultShape::Opaque);
    }

    #[test]
    fn test_collection_shapes() {
        let shape = Vec::<String>::shape();
        assert_eq!(shape, ResultShape::collection_of(ResultShape::Text));
        assert!(shape.is_collection());

        let nested = Vec::<Vec<u8>>::shape();
        assert_eq!(
            nested,
            ResultShape::collection_of(ResultShape::collection_of(ResultShape::Number))
        );

        assert!(HashMap::<String, bool>::shape().is_collection());
    }

    #[test]
    fn test_envelope_detection() {
        assert!(SearchResponse::shape().is_envelope());
        assert!(ResultShape::record("DivisionResult", 1, 0).is_envelope());
        assert!(!ResultShape::record("Hit", 4, 0).is_envelope());
        assert!(!ResultShape::Text.is_envelope());
    }

    #[test]
    fn test_shape_serde_tagging() {
        let json = serde_json::to_value(ResultShape::record("Hit", 2, 0)).unwrap();
        assert_eq!(json["kind"], "record");
        assert_eq!(json["properties"], 2);
    }
}
