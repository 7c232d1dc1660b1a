use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::models::{
    canonicalize_category, NewOrder, NewReturn, NewSupportTicket, PriceOperator, ProductFilter,
    TicketPriority,
};
use crate::store::Store;
use crate::vector::{VectorClient, DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_LIMIT};

use super::{ToolError, ToolResult};

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: &Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

#[derive(Debug, Deserialize, Default)]
struct DraftOrderArgs {
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    street_address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    product_ids: Option<Vec<i64>>,
    quantities: Option<Vec<i32>>,
}

/// Validates the information collected so far without writing anything.
/// Mirrors the reference implementation's field-by-field bookkeeping: every
/// field either lands in `missing_fields` or `provided_fields`, and once
/// products/quantities are both present they're priced against live stock.
pub async fn draft_order(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: DraftOrderArgs = parse_args(arguments)?;

    let mut missing_fields: Vec<&str> = Vec::new();
    let mut provided: Map<String, Value> = Map::new();

    macro_rules! track {
        ($field:expr, $name:literal) => {
            match &$field {
                Some(v) if !v.is_empty() => {
                    provided.insert($name.to_string(), json!(v));
                }
                _ => missing_fields.push($name),
            }
        };
    }
    track!(args.customer_name, "customer_name");
    track!(args.customer_email, "customer_email");
    track!(args.customer_phone, "customer_phone");
    track!(args.street_address, "street_address");
    track!(args.city, "city");
    track!(args.state, "state");
    track!(args.zip_code, "zip_code");

    let has_products = args.product_ids.as_ref().map_or(false, |v| !v.is_empty());
    let has_quantities = args.quantities.as_ref().map_or(false, |v| !v.is_empty());

    if !has_products {
        missing_fields.push("product_ids");
    } else if !has_quantities {
        missing_fields.push("quantities");
    } else {
        let product_ids = args.product_ids.as_ref().unwrap();
        let quantities = args.quantities.as_ref().unwrap();
        if product_ids.len() != quantities.len() {
            return Ok(ToolResult::failure_with(
                "Number of products and quantities must match",
                payload_with_missing(&missing_fields, &provided),
            ));
        }

        let mut products_info = Vec::with_capacity(product_ids.len());
        let mut total_cost = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;

        for (&product_id, &quantity) in product_ids.iter().zip(quantities) {
            let product = match store.get_product(product_id).await {
                Ok(p) => p,
                Err(_) => {
                    return Ok(ToolResult::failure_with(
                        format!("Product ID {product_id} not found"),
                        payload_with_missing(&missing_fields, &provided),
                    ))
                }
            };

            if product.stock_quantity < quantity {
                return Ok(ToolResult::failure_with(
                    format!(
                        "Insufficient stock for {}. Requested: {}, Available: {}",
                        product.name, quantity, product.stock_quantity
                    ),
                    payload_with_missing(&missing_fields, &provided),
                ));
            }

            let item_total = product.price * Decimal::from(quantity);
            let item_weight = product.weight.unwrap_or(Decimal::ZERO) * Decimal::from(quantity);
            total_cost += item_total;
            total_weight += item_weight;

            products_info.push(json!({
                "product_id": product_id,
                "name": product.name,
                "quantity": quantity,
                "unit_price": product.price,
                "item_total": item_total,
                "stock_available": product.stock_quantity,
            }));
        }

        provided.insert("products".to_string(), json!(products_info));
        provided.insert("total_cost".to_string(), json!(total_cost));
        provided.insert("total_weight".to_string(), json!(total_weight));
    }

    let ready_to_order = missing_fields.is_empty();
    let mut payload = Map::new();
    payload.insert("ready_to_order".to_string(), json!(ready_to_order));

    if ready_to_order {
        payload.insert("order_summary".to_string(), Value::Object(provided));
        payload.insert(
            "next_step".to_string(),
            json!("Call create_order with the complete information to finalize the order."),
        );
        Ok(ToolResult::success(
            "All required information collected. Ready to create order.",
            payload,
        ))
    } else {
        let descriptions: Vec<&str> = missing_fields.iter().map(|f| field_description(*f)).collect();
        payload.insert("missing_fields".to_string(), json!(missing_fields));
        payload.insert("provided_fields".to_string(), Value::Object(provided));
        payload.insert(
            "next_step".to_string(),
            json!("Ask the customer for the missing information."),
        );
        Ok(ToolResult::success(
            format!("Missing required information: {}", descriptions.join(", ")),
            payload,
        ))
    }
}

fn payload_with_missing(missing_fields: &[&str], provided: &Map<String, Value>) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("ready_to_order".to_string(), json!(false));
    payload.insert("missing_fields".to_string(), json!(missing_fields));
    payload.insert("provided_fields".to_string(), json!(provided));
    payload
}

fn field_description(field: &'static str) -> &'static str {
    match field {
        "customer_name" => "customer's full name",
        "customer_email" => "customer's email address",
        "customer_phone" => "customer's phone number",
        "street_address" => "street address",
        "city" => "city",
        "state" => "state",
        "zip_code" => "ZIP code",
        "product_ids" => "products to order",
        "quantities" => "quantities for products",
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct CreateOrderArgs {
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    street_address: String,
    city: String,
    state: String,
    zip_code: String,
    product_ids: Vec<i64>,
    quantities: Vec<i32>,
}

pub async fn create_order(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: CreateOrderArgs = parse_args(arguments)?;

    if args.product_ids.len() != args.quantities.len() {
        return Ok(ToolResult::failure(
            "Product IDs and quantities must have the same length",
        ));
    }

    let order_id = store
        .create_order(NewOrder {
            customer_name: args.customer_name.clone(),
            customer_email: args.customer_email,
            customer_phone: args.customer_phone,
            street_address: args.street_address,
            city: args.city,
            state: args.state,
            zip_code: args.zip_code,
            product_ids: args.product_ids,
            quantities: args.quantities,
        })
        .await?;

    let order = store.get_order_with_product_names(order_id).await?;

    let mut payload = Map::new();
    payload.insert("order_id".to_string(), json!(order_id));
    payload.insert("order".to_string(), json!(order));

    Ok(ToolResult::success(
        format!("Order #{order_id} created successfully for {}", args.customer_name),
        payload,
    ))
}

#[derive(Debug, Deserialize)]
struct OrderStatusArgs {
    order_id: i64,
}

pub async fn order_status(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: OrderStatusArgs = parse_args(arguments)?;
    let order = store.get_order_with_product_names(args.order_id).await?;

    let mut payload = Map::new();
    payload.insert("order_id".to_string(), json!(args.order_id));
    payload.insert("status".to_string(), json!(order.order.status));
    payload.insert("order_details".to_string(), json!(order));

    Ok(ToolResult::success(
        format!("Order #{} status: {}", args.order_id, order.order.status),
        payload,
    ))
}

#[derive(Debug, Deserialize)]
struct ProductCatalogArgs {
    category: Option<String>,
    search_query: Option<String>,
    price: Option<Decimal>,
    price_operator: Option<String>,
}

pub async fn product_catalog(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: ProductCatalogArgs = parse_args(arguments)?;

    let filter = ProductFilter {
        category: args.category.as_deref().map(canonicalize_category),
        search: args.search_query,
        price: args.price,
        price_operator: args
            .price
            .map(|_| PriceOperator::parse_or_default(args.price_operator.as_deref())),
    };

    let products = store.list_products(&filter).await?;
    let count = products.len();

    let mut payload = Map::new();
    payload.insert("count".to_string(), json!(count));
    payload.insert("products".to_string(), json!(products));

    Ok(ToolResult::success(format!("Found {count} product(s)"), payload))
}

#[derive(Debug, Deserialize)]
struct CheckInventoryArgs {
    product_id: i64,
}

pub async fn check_inventory(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: CheckInventoryArgs = parse_args(arguments)?;
    let product = store.get_product(args.product_id).await?;
    let in_stock = product.in_stock();

    let mut payload = Map::new();
    payload.insert("product_id".to_string(), json!(args.product_id));
    payload.insert("product_name".to_string(), json!(product.name));
    payload.insert("stock_quantity".to_string(), json!(product.stock_quantity));
    payload.insert("in_stock".to_string(), json!(in_stock));

    let message = if in_stock {
        format!("{}: {} units in stock", product.name, product.stock_quantity)
    } else {
        format!("{}: Out of stock", product.name)
    };

    Ok(ToolResult::success(message, payload))
}

#[derive(Debug, Deserialize)]
struct EstimateShippingArgs {
    destination_zip: String,
    weight: Decimal,
}

pub async fn estimate_shipping(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: EstimateShippingArgs = parse_args(arguments)?;
    let options = store.estimate_shipping(&args.destination_zip, args.weight).await?;

    let options_text = options
        .iter()
        .map(|o| format!("  - {} {}: ${} ({} days)", o.carrier, o.service_type, o.cost, o.estimated_days))
        .collect::<Vec<_>>()
        .join("\n");

    let mut payload = Map::new();
    payload.insert("destination_zip".to_string(), json!(args.destination_zip));
    payload.insert("weight_lbs".to_string(), json!(args.weight));
    payload.insert("estimates".to_string(), json!(options));
    payload.insert("count".to_string(), json!(options.len()));

    Ok(ToolResult::success(
        format!(
            "Shipping options to {} for {} lbs:\n{}",
            args.destination_zip, args.weight, options_text
        ),
        payload,
    ))
}

#[derive(Debug, Deserialize)]
struct CreateSupportTicketArgs {
    customer_name: String,
    customer_email: String,
    issue_description: String,
    priority: TicketPriority,
}

pub async fn create_support_ticket(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: CreateSupportTicketArgs = parse_args(arguments)?;
    let priority = args.priority;

    let ticket_id = store
        .create_ticket(NewSupportTicket {
            customer_name: args.customer_name,
            customer_email: args.customer_email,
            issue_description: args.issue_description,
            priority,
        })
        .await?;

    let ticket = store.get_ticket(ticket_id).await?;

    let mut payload = Map::new();
    payload.insert("ticket_id".to_string(), json!(ticket_id));
    payload.insert("ticket".to_string(), json!(ticket));

    Ok(ToolResult::success(
        format!("Support ticket #{ticket_id} created with {priority} priority"),
        payload,
    ))
}

#[derive(Debug, Deserialize)]
struct InitiateReturnArgs {
    order_id: i64,
    return_reason: String,
    product_ids: Option<Vec<i64>>,
    quantities: Option<Vec<i32>>,
}

pub async fn initiate_return(store: &Store, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: InitiateReturnArgs = parse_args(arguments)?;
    let returning_specific_items = args.product_ids.as_ref().map_or(false, |v| !v.is_empty());

    let return_id = store
        .create_return(NewReturn {
            order_id: args.order_id,
            reason: args.return_reason,
            product_ids: args.product_ids.clone(),
            quantities: args.quantities,
        })
        .await?;

    let return_info = store.get_return(return_id).await?;

    let returned_items: Vec<String> = return_info
        .items
        .iter()
        .map(|i| format!("{}x Product {}", i.quantity, i.product_id))
        .collect();
    let items_text = returned_items.join(", ");

    let message = if returning_specific_items {
        format!(
            "Return request #{return_id} created for {items_text} from order #{}. Refund amount: ${}",
            args.order_id, return_info.return_order.refund_total
        )
    } else {
        format!(
            "Return request #{return_id} created for entire order #{} ({items_text}). Refund amount: ${}",
            args.order_id, return_info.return_order.refund_total
        )
    };

    let mut payload = Map::new();
    payload.insert("return_id".to_string(), json!(return_id));
    payload.insert("order_id".to_string(), json!(args.order_id));
    payload.insert("return_info".to_string(), json!(return_info));
    payload.insert(
        "returned_items".to_string(),
        if returning_specific_items {
            json!(args.product_ids)
        } else {
            json!("all items")
        },
    );

    Ok(ToolResult::success(message, payload))
}

#[derive(Debug, Deserialize)]
struct SearchKnowledgeBaseArgs {
    query: String,
}

pub async fn search_knowledge_base(vector: &VectorClient, arguments: &Value) -> Result<ToolResult, ToolError> {
    let args: SearchKnowledgeBaseArgs = parse_args(arguments)?;

    let hits = vector
        .search_by_text(&args.query, DEFAULT_SEARCH_LIMIT, Some(DEFAULT_SCORE_THRESHOLD))
        .await?;

    let articles: Vec<Value> = hits
        .iter()
        .map(|hit| {
            json!({
                "title": hit.payload_str("title").unwrap_or("Untitled"),
                "content": hit.payload_str("content").unwrap_or(""),
                "category": hit.payload_str("category").unwrap_or(""),
                "relevance_score": hit.score,
                "url": hit.payload_str("url").unwrap_or(""),
            })
        })
        .collect();

    let mut payload = Map::new();
    payload.insert("query".to_string(), json!(args.query));
    payload.insert("count".to_string(), json!(articles.len()));
    payload.insert("articles".to_string(), json!(articles));

    Ok(ToolResult::success(
        format!("Found {} relevant article(s)", articles.len()),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_descriptions_cover_all_draft_order_fields() {
        assert_eq!(field_description("customer_name"), "customer's full name");
        assert_eq!(field_description("product_ids"), "products to order");
        assert_eq!(field_description("unknown_field"), "unknown_field");
    }
}
