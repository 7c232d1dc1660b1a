//! Single source of truth for the nine tool schemas. The JSON sent to the
//! LLM, the required-field validation the executor runs before dispatch, and
//! the handler that eventually reads the arguments all come from this table
//! — they cannot drift apart because there is only one place to edit.

use serde_json::{json, Value};

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: fn() -> Value,
    pub required: &'static [&'static str],
}

pub const TOOL_SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: "draft_order",
        description: "Draft an order and validate all required information before creating it. Use this FIRST before create_order to check what information is needed from the customer.",
        parameters: draft_order_params,
        required: &[],
    },
    ToolSpec {
        name: "create_order",
        description: "Create a new customer order with products and shipping information. ONLY use this after draft_order confirms all information is complete.",
        parameters: create_order_params,
        required: &[
            "customer_name", "customer_email", "customer_phone", "street_address",
            "city", "state", "zip_code", "product_ids", "quantities",
        ],
    },
    ToolSpec {
        name: "order_status",
        description: "Check the status of an existing order",
        parameters: order_status_params,
        required: &["order_id"],
    },
    ToolSpec {
        name: "product_catalog",
        description: "Browse the product catalog with optional filtering by category, search query, and price",
        parameters: product_catalog_params,
        required: &[],
    },
    ToolSpec {
        name: "check_inventory",
        description: "Check the current inventory/stock level for a specific product",
        parameters: check_inventory_params,
        required: &["product_id"],
    },
    ToolSpec {
        name: "estimate_shipping",
        description: "Estimate shipping cost and delivery time based on destination and package details",
        parameters: estimate_shipping_params,
        required: &["destination_zip", "weight"],
    },
    ToolSpec {
        name: "create_support_ticket",
        description: "Create a new customer support ticket for issues or questions",
        parameters: create_support_ticket_params,
        required: &["customer_name", "customer_email", "issue_description", "priority"],
    },
    ToolSpec {
        name: "initiate_return",
        description: "Initiate a return request for a completed order. IMPORTANT: Use product_ids and quantities to return SPECIFIC items only. If these are not provided, the ENTIRE order will be returned.",
        parameters: initiate_return_params,
        required: &["order_id", "return_reason"],
    },
    ToolSpec {
        name: "search_knowledge_base",
        description: "Search the knowledge base for helpful articles and information using semantic similarity",
        parameters: search_knowledge_base_params,
        required: &["query"],
    },
];

pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOL_SPECS.iter().find(|t| t.name == name)
}

/// Renders every spec into the `{"type": "function", "function": {...}}`
/// shape the chat completions API expects.
pub fn as_json_schemas() -> Vec<Value> {
    TOOL_SPECS
        .iter()
        .map(|spec| {
            json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": (spec.parameters)(),
                }
            })
        })
        .collect()
}

fn draft_order_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "customer_name": {"type": "string", "description": "Full name of the customer (if provided)"},
            "customer_email": {"type": "string", "description": "Email address of the customer (if provided)"},
            "customer_phone": {"type": "string", "description": "Phone number of the customer (if provided)"},
            "street_address": {"type": "string", "description": "Street address including house/building number and street name (if provided)"},
            "city": {"type": "string", "description": "City name (if provided)"},
            "state": {"type": "string", "description": "State name or abbreviation (if provided)"},
            "zip_code": {"type": "string", "description": "ZIP or postal code (if provided)"},
            "product_ids": {"type": "array", "items": {"type": "integer"}, "description": "List of product IDs to order (if provided)"},
            "quantities": {"type": "array", "items": {"type": "integer"}, "description": "List of quantities for each product (if provided)"}
        },
        "required": []
    })
}

fn create_order_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "customer_name": {"type": "string", "description": "Full name of the customer"},
            "customer_email": {"type": "string", "description": "Email address of the customer"},
            "customer_phone": {"type": "string", "description": "Phone number of the customer"},
            "street_address": {"type": "string", "description": "Street address including house/building number and street name"},
            "city": {"type": "string", "description": "City name"},
            "state": {"type": "string", "description": "State name or abbreviation"},
            "zip_code": {"type": "string", "description": "ZIP or postal code"},
            "product_ids": {"type": "array", "items": {"type": "integer"}, "description": "List of product IDs to order"},
            "quantities": {"type": "array", "items": {"type": "integer"}, "description": "List of quantities for each product (must match length of product_ids)"}
        },
        "required": ["customer_name", "customer_email", "customer_phone", "street_address", "city", "state", "zip_code", "product_ids", "quantities"]
    })
}

fn order_status_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "order_id": {"type": "integer", "description": "The unique order ID"}
        },
        "required": ["order_id"]
    })
}

fn product_catalog_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "category": {"type": "string", "description": "Filter products by category (e.g., electronics, clothing, home)"},
            "search_query": {"type": "string", "description": "Search products by name or description"},
            "price": {"type": "number", "description": "Price value to filter by (used together with price_operator)"},
            "price_operator": {"type": "string", "enum": ["gt", "lt", "eq"], "description": "Comparison operator for price filter: 'gt' = greater than, 'lt' = less than, 'eq' = equal to"}
        },
        "required": []
    })
}

fn check_inventory_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "product_id": {"type": "integer", "description": "The unique product ID"}
        },
        "required": ["product_id"]
    })
}

fn estimate_shipping_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "destination_zip": {"type": "string", "description": "Destination ZIP/postal code"},
            "weight": {"type": "number", "description": "Package weight in pounds"}
        },
        "required": ["destination_zip", "weight"]
    })
}

fn create_support_ticket_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "customer_name": {"type": "string", "description": "Name of the customer"},
            "customer_email": {"type": "string", "description": "Email address of the customer"},
            "issue_description": {"type": "string", "description": "Detailed description of the issue or question"},
            "priority": {"type": "string", "enum": ["low", "medium", "high", "urgent"], "description": "Priority level of the ticket"}
        },
        "required": ["customer_name", "customer_email", "issue_description", "priority"]
    })
}

fn initiate_return_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "order_id": {"type": "integer", "description": "The order ID to return"},
            "return_reason": {"type": "string", "description": "Reason for the return (e.g., defective, wrong item, changed mind)"},
            "product_ids": {"type": "array", "items": {"type": "integer"}, "description": "REQUIRED for partial returns: List of specific product IDs to return. MUST be provided when customer wants to return only some items from a multi-item order."},
            "quantities": {"type": "array", "items": {"type": "integer"}, "description": "REQUIRED for partial returns: Quantities for each product being returned (must match length of product_ids)."}
        },
        "required": ["order_id", "return_reason"]
    })
}

fn search_knowledge_base_params() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": "Search query describing what information is needed"}
        },
        "required": ["query"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tool_has_a_spec() {
        let names: Vec<&str> = TOOL_SPECS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"draft_order"));
        assert!(names.contains(&"search_knowledge_base"));
    }

    #[test]
    fn required_fields_are_present_in_own_schema() {
        for spec in TOOL_SPECS {
            let params = (spec.parameters)();
            let properties = params["properties"].as_object().unwrap();
            for field in spec.required {
                assert!(properties.contains_key(*field), "{} missing from {} schema", field, spec.name);
            }
        }
    }

    #[test]
    fn find_is_case_sensitive_exact_match() {
        assert!(find("order_status").is_some());
        assert!(find("Order_Status").is_none());
        assert!(find("nonexistent_tool").is_none());
    }
}
