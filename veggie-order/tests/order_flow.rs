use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;
use veggie_catalog::{CatalogService, InventoryService};
use veggie_core::{CoreError, CreditPolicy};
use veggie_order::{
    AnalyticsService, CustomerService, OrderBuilder, OrderSettings, PurchaseService,
    RecurringOrderSweep,
};
use veggie_shared::models::{
    Customer, CustomerOrder, CustomerPricing, CustomerType, InventoryItem, Invoice, InvoiceItem,
    OrderItem, PaymentStatus, StockMovementKind, StockTransaction, Vegetable, Vendor,
};
use veggie_shared::{AppSettings, LocalizedNames};
use veggie_store::{DbClient, SqliteStore};

async fn store() -> Arc<SqliteStore> {
    let db = DbClient::in_memory().await.expect("in-memory database");
    Arc::new(db.store())
}

async fn customer(store: &Arc<SqliteStore>, credit_limit: Decimal) -> Customer {
    let mut customer = Customer::new("Sri Ganesh Hotel", CustomerType::Wholesale, credit_limit);
    CustomerService::new(store.clone()).save(&mut customer).await.unwrap();
    customer
}

async fn vegetable(store: &Arc<SqliteStore>, name: &str, per_kg: Decimal) -> Vegetable {
    let mut vegetable = Vegetable::new(LocalizedNames::english(name)).with_price("kg", per_kg);
    CatalogService::new(store.clone())
        .save_vegetable(&mut vegetable)
        .await
        .unwrap();
    vegetable
}

async fn stock(store: &Arc<SqliteStore>, vegetable: &Vegetable, quantity: Decimal, location: &str) -> InventoryItem {
    let mut item = InventoryItem::new(vegetable.id, vegetable.names.en.clone(), "kg", location);
    item.quantity = quantity;
    item.reorder_point = dec!(5);
    InventoryService::new(store.clone()).save_item(&mut item).await.unwrap();
    item
}

fn builder(store: &Arc<SqliteStore>, credit_policy: CreditPolicy) -> OrderBuilder<SqliteStore> {
    OrderBuilder::new(
        store.clone(),
        OrderSettings {
            credit_policy,
            ..OrderSettings::default()
        },
    )
}

async fn quantity_at(store: &Arc<SqliteStore>, vegetable: &Vegetable, location: &str) -> Option<Decimal> {
    InventoryService::new(store.clone())
        .item_at_location(vegetable.id, location)
        .await
        .unwrap()
        .map(|item| item.quantity)
}

#[tokio::test]
async fn test_pending_order_charges_credit_and_draws_stock() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    let shelf = stock(&store, &tomato, dec!(100), "MAIN").await;

    let placed = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await
        .unwrap();

    assert!(placed.order.order_number.starts_with("ORD"));
    assert_eq!(placed.order.total_amount, dec!(500));
    assert_eq!(placed.items[0].final_total, dec!(500));
    assert_eq!(placed.items[0].order_id, placed.order.id);
    assert_eq!(placed.stock_transactions.len(), 1);

    let movement = &placed.stock_transactions[0];
    assert_eq!(movement.kind, StockMovementKind::Out);
    assert_eq!(movement.inventory_item_id, shelf.id);
    assert_eq!(movement.order_id, Some(placed.order.id));
    assert_eq!(
        movement.reference_number.as_deref(),
        Some(placed.order.order_number.as_str())
    );
    assert!(!movement.reference_number.as_deref().unwrap().starts_with("ORD-ORD"));

    let customers = CustomerService::new(store.clone());
    let reloaded = customers.customer(buyer.id).await.unwrap().unwrap();
    assert_eq!(reloaded.current_credit, dec!(500));
    assert_eq!(quantity_at(&store, &tomato, "MAIN").await, Some(dec!(90)));

    let items = customers.order_items(placed.order.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].total, dec!(500));
}

#[tokio::test]
async fn test_contact_edit_keeps_credit_from_orders() {
    let store = store().await;
    let mut buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    stock(&store, &tomato, dec!(100), "MAIN").await;

    builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await
        .unwrap();

    // copy loaded before the order still says zero
    assert_eq!(buyer.current_credit, Decimal::ZERO);
    buyer.phone_number = Some("+91 98480 22338".to_string());
    let customers = CustomerService::new(store.clone());
    customers.save(&mut buyer).await.unwrap();

    let reloaded = customers.customer(buyer.id).await.unwrap().unwrap();
    assert_eq!(reloaded.phone_number.as_deref(), Some("+91 98480 22338"));
    assert_eq!(reloaded.current_credit, dec!(500));
    assert_eq!(buyer.current_credit, dec!(500));
}

#[tokio::test]
async fn test_new_customer_starts_without_credit() {
    let store = store().await;
    let mut walk_in = Customer::new("Lakshmi Tiffins", CustomerType::Retail, dec!(200));
    walk_in.current_credit = dec!(75);

    let customers = CustomerService::new(store.clone());
    customers.save(&mut walk_in).await.unwrap();

    let reloaded = customers.customer(walk_in.id).await.unwrap().unwrap();
    assert_eq!(reloaded.current_credit, Decimal::ZERO);
}

#[tokio::test]
async fn test_threshold_edit_keeps_stock_drawn_by_orders() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    let mut shelf = stock(&store, &tomato, dec!(100), "MAIN").await;

    builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await
        .unwrap();

    let inventory = InventoryService::new(store.clone());
    shelf.reorder_point = dec!(20);
    shelf.batch_number = Some("B-0612".to_string());
    inventory.save_item(&mut shelf).await.unwrap();

    let reloaded = inventory.item(shelf.id).await.unwrap().unwrap();
    assert_eq!(reloaded.quantity, dec!(90));
    assert_eq!(reloaded.wastage_quantity, Decimal::ZERO);
    assert_eq!(reloaded.reorder_point, dec!(20));
    assert_eq!(reloaded.batch_number.as_deref(), Some("B-0612"));
    assert_eq!(shelf.quantity, dec!(90));
}

#[tokio::test]
async fn test_order_beyond_decimal_range_is_rejected() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    stock(&store, &tomato, dec!(100), "MAIN").await;

    let result = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, Decimal::MAX, "kg")],
        )
        .await;
    assert!(matches!(result, Err(CoreError::ValidationError(_))));

    let customers = CustomerService::new(store.clone());
    assert!(customers.orders(buyer.id).await.unwrap().is_empty());
    assert_eq!(quantity_at(&store, &tomato, "MAIN").await, Some(dec!(100)));
}

#[tokio::test]
async fn test_paid_order_leaves_credit_untouched() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let onion = vegetable(&store, "Onion", dec!(30)).await;
    stock(&store, &onion, dec!(50), "MAIN").await;

    let mut order = CustomerOrder::new(buyer.id);
    order.payment_status = PaymentStatus::Paid;
    builder(&store, CreditPolicy::Warn)
        .create_order(order, vec![OrderItem::new(onion.id, dec!(2), "kg")])
        .await
        .unwrap();

    let reloaded = CustomerService::new(store.clone())
        .customer(buyer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.current_credit, Decimal::ZERO);
}

#[tokio::test]
async fn test_order_beyond_stock_is_rejected() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(40)).await;
    stock(&store, &tomato, dec!(10), "MAIN").await;

    let result = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(15), "kg")],
        )
        .await;

    match result {
        Err(CoreError::InsufficientStock { requested, available, .. }) => {
            assert_eq!(requested, dec!(15));
            assert_eq!(available, dec!(10));
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }
    assert_eq!(quantity_at(&store, &tomato, "MAIN").await, Some(dec!(10)));
}

#[tokio::test]
async fn test_failing_line_rolls_back_whole_order() {
    let store = store().await;
    let buyer = customer(&store, dec!(5000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(40)).await;
    let onion = vegetable(&store, "Onion", dec!(30)).await;
    let tomato_shelf = stock(&store, &tomato, dec!(100), "MAIN").await;
    stock(&store, &onion, dec!(10), "MAIN").await;

    let result = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![
                OrderItem::new(tomato.id, dec!(5), "kg"),
                OrderItem::new(onion.id, dec!(20), "kg"),
            ],
        )
        .await;
    assert!(matches!(result, Err(CoreError::InsufficientStock { .. })));

    let customers = CustomerService::new(store.clone());
    assert!(customers.orders(buyer.id).await.unwrap().is_empty());
    assert_eq!(
        customers.customer(buyer.id).await.unwrap().unwrap().current_credit,
        Decimal::ZERO
    );
    assert_eq!(quantity_at(&store, &tomato, "MAIN").await, Some(dec!(100)));

    let now = Utc::now();
    let history = InventoryService::new(store.clone())
        .history(tomato_shelf.id, now - Duration::days(1), now + Duration::days(1))
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_order_validation() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(40)).await;
    let orders = builder(&store, CreditPolicy::Warn);

    let empty = orders.create_order(CustomerOrder::new(buyer.id), vec![]).await;
    assert!(matches!(empty, Err(CoreError::ValidationError(_))));

    let unknown_customer = orders
        .create_order(
            CustomerOrder::new(Uuid::new_v4()),
            vec![OrderItem::new(tomato.id, dec!(1), "kg")],
        )
        .await;
    assert!(matches!(unknown_customer, Err(CoreError::NotFound { entity: "Customer", .. })));

    // no inventory row at MAIN
    let unstocked = orders
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(1), "kg")],
        )
        .await;
    assert!(matches!(unstocked, Err(CoreError::NotFound { entity: "Inventory item", .. })));

    // no catalog price per box
    stock(&store, &tomato, dec!(10), "MAIN").await;
    let unpriced = orders
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(1), "box")],
        )
        .await;
    assert!(matches!(unpriced, Err(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_special_price_applies_above_minimum_quantity() {
    let store = store().await;
    let buyer = customer(&store, dec!(5000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(40)).await;
    let carrot = vegetable(&store, "Carrot", dec!(35)).await;
    stock(&store, &tomato, dec!(100), "MAIN").await;
    stock(&store, &carrot, dec!(100), "MAIN").await;

    let customers = CustomerService::new(store.clone());
    for vegetable in [&tomato, &carrot] {
        customers
            .save_pricing(&CustomerPricing {
                id: Uuid::new_v4(),
                customer_id: buyer.id,
                vegetable_id: vegetable.id,
                special_price: dec!(36),
                unit: "kg".to_string(),
                valid_from: Utc::now() - Duration::days(1),
                valid_to: None,
                minimum_quantity: dec!(10),
                discount_percentage: dec!(5),
            })
            .await
            .unwrap();
    }

    let placed = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![
                OrderItem::new(tomato.id, dec!(12), "kg"),
                OrderItem::new(carrot.id, dec!(5), "kg"),
            ],
        )
        .await
        .unwrap();

    let special = &placed.items[0];
    assert_eq!(special.unit_price, dec!(36));
    assert_eq!(special.total, dec!(432));
    assert_eq!(special.discount_amount, dec!(21.6));
    assert_eq!(special.final_total, dec!(410.4));

    let catalog = &placed.items[1];
    assert_eq!(catalog.unit_price, dec!(35));
    assert_eq!(catalog.discount_percentage, Decimal::ZERO);
    assert_eq!(catalog.final_total, dec!(175));

    assert_eq!(placed.order.total_amount, dec!(585.4));
}

#[tokio::test]
async fn test_recurring_order_gets_next_date() {
    let store = store().await;
    let buyer = customer(&store, dec!(1000)).await;
    let potato = vegetable(&store, "Potato", dec!(25)).await;
    stock(&store, &potato, dec!(100), "MAIN").await;

    let placed = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id).recurring("FREQ=WEEKLY;INTERVAL=2"),
            vec![OrderItem::new(potato.id, dec!(4), "kg")],
        )
        .await
        .unwrap();

    assert_eq!(
        placed.order.next_order_date,
        Some(placed.order.order_date + Duration::days(14))
    );

    let history = CustomerService::new(store.clone()).orders(buyer.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].next_order_date, placed.order.next_order_date);

    let bad = builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id).recurring("FREQ=YEARLY;INTERVAL=1"),
            vec![OrderItem::new(potato.id, dec!(1), "kg")],
        )
        .await;
    assert!(matches!(bad, Err(CoreError::InvalidPattern(_))));
    assert_eq!(quantity_at(&store, &potato, "MAIN").await, Some(dec!(96)));
}

#[tokio::test]
async fn test_sweep_creates_one_clone_per_due_date() {
    let store = store().await;
    let buyer = customer(&store, dec!(10000)).await;
    let spinach = vegetable(&store, "Spinach", dec!(20)).await;
    stock(&store, &spinach, dec!(100), "MAIN").await;

    let orders = Arc::new(builder(&store, CreditPolicy::Warn));
    let mut source = CustomerOrder::new(buyer.id).recurring("FREQ=DAILY;INTERVAL=1");
    source.delivery_address = Some("12 Market Road".to_string());
    let placed = orders
        .create_order(source, vec![OrderItem::new(spinach.id, dec!(3), "kg")])
        .await
        .unwrap();
    let due_at = placed.order.next_order_date.unwrap();

    let sweep = RecurringOrderSweep::new(orders.clone());
    assert_eq!(sweep.run_once(due_at - Duration::hours(1)).await.unwrap().due, 0);

    let (first, second) = tokio::join!(sweep.run_once(due_at), sweep.run_once(due_at));
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(first.created + second.created, 1);
    assert_eq!(first.failed + second.failed, 0);

    let again = sweep.run_once(due_at).await.unwrap();
    assert_eq!(again.created, 0);

    let history = CustomerService::new(store.clone()).orders(buyer.id).await.unwrap();
    assert_eq!(history.len(), 2);

    let original = history.iter().find(|o| o.id == placed.order.id).unwrap();
    assert_eq!(original.next_order_date, None);

    let clone = history.iter().find(|o| o.id != placed.order.id).unwrap();
    assert!(clone.is_recurring);
    assert_eq!(clone.recurrence_pattern.as_deref(), Some("FREQ=DAILY;INTERVAL=1"));
    assert_eq!(clone.delivery_address.as_deref(), Some("12 Market Road"));
    assert_eq!(clone.total_amount, dec!(60));
    assert!(clone.next_order_date.unwrap() > due_at);

    assert_eq!(quantity_at(&store, &spinach, "MAIN").await, Some(dec!(94)));
}

#[tokio::test]
async fn test_block_policy_rejects_over_limit() {
    let store = store().await;
    let buyer = customer(&store, dec!(100)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    stock(&store, &tomato, dec!(100), "MAIN").await;

    let result = builder(&store, CreditPolicy::Block)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await;

    match result {
        Err(CoreError::CreditLimitExceeded { limit, balance, .. }) => {
            assert_eq!(limit, dec!(100));
            assert_eq!(balance, dec!(500));
        }
        other => panic!("expected CreditLimitExceeded, got {:?}", other),
    }
    assert_eq!(quantity_at(&store, &tomato, "MAIN").await, Some(dec!(100)));

    // Warn accepts the same order
    builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await
        .unwrap();
    let reloaded = CustomerService::new(store.clone())
        .customer(buyer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.current_credit, dec!(500));
}

#[tokio::test]
async fn test_transfer_moves_stock_between_locations() {
    let store = store().await;
    let cucumber = vegetable(&store, "Cucumber", dec!(30)).await;
    let main = stock(&store, &cucumber, dec!(100), "MAIN").await;
    let inventory = InventoryService::new(store.clone());

    let recorded = inventory
        .record(StockTransaction::transfer(main.id, dec!(30), "kg", "COLD"))
        .await
        .unwrap();
    assert_eq!(recorded.source_location.as_deref(), Some("MAIN"));

    inventory
        .record(StockTransaction::transfer(main.id, dec!(10), "kg", "COLD"))
        .await
        .unwrap();

    assert_eq!(quantity_at(&store, &cucumber, "MAIN").await, Some(dec!(60)));
    let cold = inventory.item_at_location(cucumber.id, "COLD").await.unwrap().unwrap();
    assert_eq!(cold.quantity, dec!(40));
    assert_eq!(cold.reorder_point, main.reorder_point);

    let over = inventory
        .record(StockTransaction::transfer(main.id, dec!(61), "kg", "COLD"))
        .await;
    assert!(matches!(over, Err(CoreError::InsufficientStock { .. })));

    let same_place = inventory
        .record(StockTransaction::transfer(main.id, dec!(1), "kg", "MAIN"))
        .await;
    assert!(matches!(same_place, Err(CoreError::ValidationError(_))));

    let now = Utc::now();
    let history = inventory
        .history(main.id, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].transaction_date >= history[1].transaction_date);
}

#[tokio::test]
async fn test_waste_and_low_stock() {
    let store = store().await;
    let carrot = vegetable(&store, "Carrot", dec!(35)).await;
    let shelf = stock(&store, &carrot, dec!(12), "MAIN").await;
    let inventory = InventoryService::new(store.clone());

    assert!(inventory.low_stock().await.unwrap().is_empty());

    inventory
        .record(StockTransaction::new(shelf.id, StockMovementKind::Waste, dec!(8), "kg"))
        .await
        .unwrap();

    let item = inventory.item(shelf.id).await.unwrap().unwrap();
    assert_eq!(item.quantity, dec!(4));
    assert_eq!(item.wastage_quantity, dec!(8));

    let low = inventory.low_stock().await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, shelf.id);

    let too_much = inventory
        .record(StockTransaction::new(shelf.id, StockMovementKind::Waste, dec!(5), "kg"))
        .await;
    assert!(matches!(too_much, Err(CoreError::InvalidQuantity { .. })));
}

#[tokio::test]
async fn test_purchase_invoice_and_sales_summary() {
    let store = store().await;
    let buyer = customer(&store, dec!(5000)).await;
    let tomato = vegetable(&store, "Tomato", dec!(50)).await;
    stock(&store, &tomato, dec!(100), "MAIN").await;

    let purchases = PurchaseService::new(store.clone());
    let mut vendor = Vendor::new("Kurnool Farms");
    purchases.save_vendor(&mut vendor).await.unwrap();

    let (invoice, items) = purchases
        .create_invoice(
            Invoice::new(vendor.id, "KF-0042", Utc::now()),
            vec![
                InvoiceItem::new(tomato.id, dec!(10), dec!(18)),
                InvoiceItem::new(tomato.id, dec!(5), dec!(24)),
            ],
        )
        .await
        .unwrap();
    assert_eq!(items[0].total, dec!(180));
    assert_eq!(invoice.total_amount, dec!(300));
    assert_eq!(purchases.invoices(vendor.id).await.unwrap().len(), 1);
    assert_eq!(purchases.invoice_items(invoice.id).await.unwrap().len(), 2);

    let orphan = purchases
        .create_invoice(
            Invoice::new(Uuid::new_v4(), "X-1", Utc::now()),
            vec![InvoiceItem::new(tomato.id, dec!(1), dec!(1))],
        )
        .await;
    assert!(matches!(orphan, Err(CoreError::NotFound { entity: "Vendor", .. })));

    builder(&store, CreditPolicy::Warn)
        .create_order(
            CustomerOrder::new(buyer.id),
            vec![OrderItem::new(tomato.id, dec!(10), "kg")],
        )
        .await
        .unwrap();

    let now = Utc::now();
    let summary = AnalyticsService::new(store.clone(), AppSettings::default())
        .sales_summary(now - Duration::days(1), now + Duration::days(1))
        .await
        .unwrap();

    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_revenue, dec!(500));
    assert_eq!(summary.total_cost, dec!(300));
    assert_eq!(summary.profit, dec!(200));
    assert_eq!(summary.vegetable_sales["Tomato"], dec!(500));
    assert_eq!(summary.vendor_purchases["Kurnool Farms"], dec!(300));
}
