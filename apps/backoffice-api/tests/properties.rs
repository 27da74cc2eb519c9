//! End-to-end behavior of the facade commands over an in-memory store.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use backoffice_api::commands::analytics::{list_sales, revenue_by_period, sales_summary, SalesQuery};
use backoffice_api::commands::category::{create_category, CreateCategoryRequest};
use backoffice_api::commands::health::health;
use backoffice_api::commands::inventory::{
    get_inventory, low_stock, update_inventory, LowStockQuery, UpdateInventoryRequest,
};
use backoffice_api::commands::product::{create_product, get_product, CreateProductRequest, ProductResponse};
use backoffice_api::commands::sale::{create_sale, get_sale, CreateSaleRequest, SaleItemRequest};
use backoffice_api::commands::Pagination;
use backoffice_api::{ApiConfig, AppState, ErrorCode};
use backoffice_core::{NewSale, NewSaleItem, Price};
use backoffice_db::{Database, DbConfig};

async fn state() -> AppState {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::new(db, ApiConfig::default())
}

async fn category(state: &AppState, name: &str) -> i64 {
    create_category(
        state,
        CreateCategoryRequest {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn product(state: &AppState, category_id: i64, name: &str, price: Decimal) -> ProductResponse {
    create_product(
        state,
        CreateProductRequest {
            name: name.to_string(),
            description: None,
            price,
            category_id,
        },
    )
    .await
    .unwrap()
}

fn item(product_id: i64, quantity: i64, unit_price: Decimal) -> SaleItemRequest {
    SaleItemRequest {
        product_id,
        quantity,
        unit_price,
    }
}

fn sale(items: Vec<SaleItemRequest>) -> CreateSaleRequest {
    CreateSaleRequest {
        payment_method: Some("Cash".to_string()),
        customer_email: None,
        items,
    }
}

fn everything() -> SalesQuery {
    SalesQuery {
        pagination: Pagination::new(0, 1000),
        ..SalesQuery::default()
    }
}

#[tokio::test]
async fn test_health_reports_reachable_store() {
    let state = state().await;
    assert!(health(&state).await);
}

#[tokio::test]
async fn test_empty_store_summary_is_all_zero() {
    let state = state().await;

    let summary = sales_summary(&state).await.unwrap();
    assert_eq!(summary.total_sales, 0);
    assert_eq!(summary.total_revenue, Decimal::ZERO);
    assert_eq!(summary.average_order_value, Decimal::ZERO);
    assert_eq!(summary.products_sold, 0);

    assert!(revenue_by_period(&state, "monthly").await.unwrap().is_empty());
    assert!(list_sales(&state, everything()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sale_total_equals_sum_of_lines() {
    let state = state().await;
    let cat = category(&state, "Beverages").await;
    let coffee = product(&state, cat, "Coffee", dec!(10.99)).await;
    let tea = product(&state, cat, "Tea", dec!(5.00)).await;

    let created = create_sale(
        &state,
        sale(vec![item(coffee.id, 2, dec!(10.99)), item(tea.id, 3, dec!(5.00))]),
    )
    .await
    .unwrap();

    assert_eq!(created.total_amount, dec!(36.98));
    let lines: Decimal = created.items.iter().map(|i| i.total_price).sum();
    assert_eq!(created.total_amount, lines);

    let fetched = get_sale(&state, created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.items[0].product_id, coffee.id);
    assert_eq!(fetched.items[1].product_id, tea.id);
}

#[tokio::test]
async fn test_summary_agrees_with_listing() {
    let state = state().await;
    let cat = category(&state, "Snacks").await;
    let chips = product(&state, cat, "Chips", dec!(2.50)).await;
    let nuts = product(&state, cat, "Nuts", dec!(4.25)).await;

    for (qty, price) in [(1, dec!(2.50)), (4, dec!(2.00)), (2, dec!(4.25))] {
        let id = if price == dec!(4.25) { nuts.id } else { chips.id };
        create_sale(&state, sale(vec![item(id, qty, price)])).await.unwrap();
    }

    let summary = sales_summary(&state).await.unwrap();
    let sales = list_sales(&state, everything()).await.unwrap();

    assert_eq!(summary.total_sales, sales.len() as i64);
    assert_eq!(
        summary.total_revenue,
        sales.iter().map(|s| s.total_amount).sum::<Decimal>()
    );
    assert_eq!(
        summary.products_sold,
        sales.iter().flat_map(|s| &s.items).map(|i| i.quantity).sum::<i64>()
    );
    // 19.00 / 3
    assert_eq!(summary.average_order_value, dec!(6.33));
}

#[tokio::test]
async fn test_revenue_buckets_sum_to_total_for_every_period() {
    let state = state().await;
    let cat = category(&state, "Tools").await;
    let hammer = product(&state, cat, "Hammer", dec!(12.00)).await;

    let base = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    for (days, cents) in [(0, 1200), (3, 2400), (20, 1200), (45, 3600), (400, 1200)] {
        let new_sale = NewSale {
            payment_method: None,
            customer_email: None,
            items: vec![NewSaleItem {
                product_id: hammer.id,
                quantity: cents / 1200,
                unit_price: Price::from_cents(1200),
            }],
        };
        state
            .db()
            .sales()
            .record_at(&new_sale, base + Duration::days(days))
            .await
            .unwrap();
    }

    let total = sales_summary(&state).await.unwrap().total_revenue;
    assert_eq!(total, dec!(96.00));

    for period in ["daily", "weekly", "monthly", "yearly"] {
        let buckets = revenue_by_period(&state, period).await.unwrap();
        let sum: Decimal = buckets.iter().map(|b| b.total_revenue).sum();
        assert_eq!(sum, total, "period {}", period);

        let labels: Vec<_> = buckets.iter().map(|b| b.period.clone()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted, "period {}", period);
    }

    let yearly = revenue_by_period(&state, "yearly").await.unwrap();
    assert_eq!(yearly.len(), 2);
    assert_eq!(yearly[0].period, "2024");
    assert_eq!(yearly[1].period, "2025");
}

#[tokio::test]
async fn test_unknown_period_is_invalid_input() {
    let state = state().await;

    let err = revenue_by_period(&state, "hourly").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_unknown_period_is_rejected_before_touching_the_store() {
    let state = state().await;
    state.db().close().await;

    let err = revenue_by_period(&state, "hourly").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = revenue_by_period(&state, "daily").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageFailure);
}

#[tokio::test]
async fn test_low_stock_with_default_threshold() {
    let state = state().await;
    let cat = category(&state, "Stationery").await;

    let mut ids = Vec::new();
    for (i, quantity) in [0, 4, 5, 6, 10].into_iter().enumerate() {
        let p = product(&state, cat, &format!("Item {}", i), dec!(1.00)).await;
        update_inventory(
            &state,
            p.id,
            UpdateInventoryRequest {
                quantity,
                low_stock_threshold: None,
            },
        )
        .await
        .unwrap();
        ids.push(p.id);
    }
    // Never stocked; not reported
    product(&state, cat, "Unstocked", dec!(1.00)).await;

    let alerts = low_stock(&state, LowStockQuery::default()).await.unwrap();
    let quantities: Vec<_> = alerts.iter().map(|a| a.current_quantity).collect();
    assert_eq!(quantities, vec![0, 4]);
    assert_eq!(alerts[0].product_id, ids[0]);
    assert_eq!(alerts[0].product_name, "Item 0");
    assert_eq!(alerts[0].threshold, 5);

    let wider = low_stock(&state, LowStockQuery { threshold: Some(7) }).await.unwrap();
    assert_eq!(wider.len(), 4);

    assert!(low_stock(&state, LowStockQuery { threshold: Some(0) })
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_update_inventory_rejects_negative_and_unknown() {
    let state = state().await;
    let cat = category(&state, "Garden").await;
    let hose = product(&state, cat, "Hose", dec!(20.00)).await;

    let request = UpdateInventoryRequest {
        quantity: -1,
        low_stock_threshold: None,
    };
    let err = update_inventory(&state, hose.id, request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let request = UpdateInventoryRequest {
        quantity: 3,
        low_stock_threshold: None,
    };
    let err = update_inventory(&state, 999, request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = get_inventory(&state, hose.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_filters_by_product_and_category() {
    let state = state().await;
    let drinks = category(&state, "Drinks").await;
    let food = category(&state, "Food").await;
    let cola = product(&state, drinks, "Cola", dec!(1.50)).await;
    let bread = product(&state, food, "Bread", dec!(3.00)).await;

    let only_cola = create_sale(&state, sale(vec![item(cola.id, 1, dec!(1.50))])).await.unwrap();
    let mixed = create_sale(
        &state,
        sale(vec![item(cola.id, 2, dec!(1.50)), item(bread.id, 1, dec!(3.00))]),
    )
    .await
    .unwrap();
    let only_bread = create_sale(&state, sale(vec![item(bread.id, 1, dec!(3.00))])).await.unwrap();

    let by_product = list_sales(
        &state,
        SalesQuery {
            product_id: Some(bread.id),
            ..everything()
        },
    )
    .await
    .unwrap();
    let ids: Vec<_> = by_product.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![mixed.id, only_bread.id]);
    // Matching sales keep all of their items
    assert_eq!(by_product[0].items.len(), 2);

    let by_category = list_sales(
        &state,
        SalesQuery {
            category_id: Some(drinks),
            ..everything()
        },
    )
    .await
    .unwrap();
    let ids: Vec<_> = by_category.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![only_cola.id, mixed.id]);

    let paged = list_sales(
        &state,
        SalesQuery {
            pagination: Pagination::new(1, 1),
            ..SalesQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].id, mixed.id);
}

#[tokio::test]
async fn test_inverted_date_range_is_empty() {
    let state = state().await;
    let cat = category(&state, "Toys").await;
    let ball = product(&state, cat, "Ball", dec!(7.00)).await;
    create_sale(&state, sale(vec![item(ball.id, 1, dec!(7.00))])).await.unwrap();

    let now = Utc::now();
    let sales = list_sales(
        &state,
        SalesQuery {
            start_date: Some(now + Duration::days(1)),
            end_date: Some(now - Duration::days(1)),
            ..everything()
        },
    )
    .await
    .unwrap();
    assert!(sales.is_empty());
}

#[tokio::test]
async fn test_empty_sale_is_invalid_input() {
    let state = state().await;

    let err = create_sale(&state, sale(Vec::new())).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(state.db().sales().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_product_leaves_store_unchanged() {
    let state = state().await;
    let cat = category(&state, "Music").await;
    let guitar = product(&state, cat, "Guitar", dec!(150.00)).await;
    create_sale(&state, sale(vec![item(guitar.id, 1, dec!(150.00))])).await.unwrap();

    let err = create_sale(
        &state,
        sale(vec![item(guitar.id, 1, dec!(150.00)), item(999, 1, dec!(1.00))]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    assert_eq!(state.db().sales().count().await.unwrap(), 1);
    assert_eq!(state.db().sales().count_items().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sub_cent_price_rounds_the_line_total() {
    let state = state().await;
    let cat = category(&state, "Fuel").await;
    let diesel = product(&state, cat, "Diesel", dec!(8.333)).await;
    assert_eq!(diesel.price, dec!(8.333));

    let created = create_sale(&state, sale(vec![item(diesel.id, 3, dec!(8.333))])).await.unwrap();
    assert_eq!(created.total_amount, dec!(25.00));
    assert_eq!(created.items[0].total_price, dec!(25.00));

    let fetched = get_sale(&state, created.id).await.unwrap();
    assert_eq!(fetched.items[0].unit_price, dec!(8.333));
    assert_eq!(fetched, created);

    // 0.125 → 0.13, half away from zero
    let half = create_sale(&state, sale(vec![item(diesel.id, 1, dec!(0.125))])).await.unwrap();
    assert_eq!(half.total_amount, dec!(0.13));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let state = state().await;

    assert_eq!(get_product(&state, 42).await.unwrap_err().code, ErrorCode::NotFound);
    assert_eq!(get_sale(&state, 42).await.unwrap_err().code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_product_with_unknown_category_is_invalid_input() {
    let state = state().await;

    let err = create_product(
        &state,
        CreateProductRequest {
            name: "Orphan".to_string(),
            description: None,
            price: dec!(1.00),
            category_id: 77,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.message, "Category 77 does not exist");
}
