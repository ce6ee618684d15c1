//! Category defaults and declared-shape heuristics.

use crate::tool::entities::ToolCategory;
use crate::tool::shape::ResultShape;

const BOOLEAN_OR_NUMBER_TOKENS: u64 = 30;
const DATE_TOKENS: u64 = 40;
const TEXT_TOKENS: u64 = 50;

const TOKENS_PER_PROPERTY: u64 = 25;
const TOKENS_PER_METHOD: u64 = 15;
const RECORD_OVERHEAD_TOKENS: u64 = 100;
/// Used when nothing is known about the shape.
const OPAQUE_TOKENS: u64 = 400;

/// Reserved for envelope metadata on response/result wrappers.
const ENVELOPE_TOKENS: u64 = 200;
const ENVELOPE_BODY_FLOOR: u64 = 500;

/// Per-item structural overhead inside a collection.
const COLLECTION_ITEM_OVERHEAD: u64 = 2;

/// Default estimate for a category, used as a floor when nothing richer is
/// known.
pub fn category_baseline(category: ToolCategory) -> u64 {
    match category {
        ToolCategory::Query => 2000,
        ToolCategory::Analysis => 1500,
        ToolCategory::Resources => 800,
        ToolCategory::Utility => 500,
        ToolCategory::Integration => 1200,
        ToolCategory::Monitoring => 1000,
        _ => 1000,
    }
}

/// How many items a collection result from this category usually holds.
pub fn expected_items(category: ToolCategory) -> u64 {
    match category {
        ToolCategory::Query => 25,
        ToolCategory::Analysis => 15,
        ToolCategory::Resources => 50,
        ToolCategory::Utility => 5,
        _ => 20,
    }
}

/// Estimate the cost of a result with the given declared shape.
pub fn estimate_shape(shape: &ResultShape, category: ToolCategory) -> u64 {
    match shape {
        ResultShape::Boolean | ResultShape::Number => BOOLEAN_OR_NUMBER_TOKENS,
        ResultShape::Date => DATE_TOKENS,
        ResultShape::Text => TEXT_TOKENS,
        ResultShape::Record {
            properties,
            methods,
            ..
        } => {
            let body = record_tokens(*properties, *methods);
            if shape.is_envelope() {
                ENVELOPE_TOKENS + body.max(ENVELOPE_BODY_FLOOR)
            } else {
                body
            }
        }
        ResultShape::Collection { item } => {
            let count = expected_items(category);
            let per_item = estimate_shape(item, category);
            per_item
                .saturating_mul(count)
                .saturating_add(COLLECTION_ITEM_OVERHEAD * count)
        }
        ResultShape::Opaque => OPAQUE_TOKENS,
    }
}

fn record_tokens(properties: usize, methods: usize) -> u64 {
    TOKENS_PER_PROPERTY * properties as u64 + TOKENS_PER_METHOD * methods as u64 + RECORD_OVERHEAD_TOKENS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_baselines() {
        assert_eq!(category_baseline(ToolCategory::Query), 2000);
        assert_eq!(category_baseline(ToolCategory::Analysis), 1500);
        assert_eq!(category_baseline(ToolCategory::Resources), 800);
        assert_eq!(category_baseline(ToolCategory::Utility), 500);
        assert_eq!(category_baseline(ToolCategory::Integration), 1200);
        assert_eq!(category_baseline(ToolCategory::Monitoring), 1000);
        assert_eq!(category_baseline(ToolCategory::Security), 1000);
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(estimate_shape(&ResultShape::Boolean, ToolCategory::General), 30);
        assert_eq!(estimate_shape(&ResultShape::Date, ToolCategory::General), 40);
        assert_eq!(estimate_shape(&ResultShape::Text, ToolCategory::General), 50);
        assert_eq!(estimate_shape(&ResultShape::Opaque, ToolCategory::General), 400);
    }

    #[test]
    fn test_record_fallback_formula() {
        let shape = ResultShape::record("Hit", 4, 2);
        assert_eq!(estimate_shape(&shape, ToolCategory::General), 25 * 4 + 15 * 2 + 100);
    }

    #[test]
    fn test_envelope_floor() {
        let small = ResultShape::record("EchoResponse", 1, 0);
        assert_eq!(estimate_shape(&small, ToolCategory::Utility), 200 + 500);

        let large = ResultShape::record("ReportResult", 30, 0);
        assert_eq!(estimate_shape(&large, ToolCategory::Utility), 200 + 25 * 30 + 100);
    }

    #[test]
    fn test_collection_scales_with_category() {
        let shape = ResultShape::collection_of(ResultShape::Text);
        // Query expects 25 items: 25 * 50 + 2 * 25
        assert_eq!(estimate_shape(&shape, ToolCategory::Query), 1300);
        // Utility expects 5 items: 5 * 50 + 2 * 5
        assert_eq!(estimate_shape(&shape, ToolCategory::Utility), 260);
        // Resources expects 50 items
        assert_eq!(estimate_shape(&shape, ToolCategory::Resources), 2600);
    }
}
