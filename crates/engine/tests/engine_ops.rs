//! Black-box tests for the full operation surface of the store engine.
//!
//! Every operation enters through `StoreEngine`, which serializes mutations
//! and publishes committed events; these tests observe only public behavior.

use std::sync::Arc;

use storeledger_auth::CallerId;
use storeledger_core::{ItemId, OrderId, StoreError};
use storeledger_engine::{
    RecordingTransfers, StoreEngine, StoreEvent, Transfer,
};
use storeledger_events::{EventEnvelope, InMemoryEventBus};
use storeledger_orders::OrderStatus;

type TestEngine =
    StoreEngine<Arc<InMemoryEventBus<EventEnvelope<StoreEvent>>>, Arc<RecordingTransfers>>;

fn setup() -> (TestEngine, CallerId, Arc<RecordingTransfers>) {
    let merchant = CallerId::new();
    let transfers = Arc::new(RecordingTransfers::new());
    let engine = StoreEngine::new(merchant, Arc::new(InMemoryEventBus::new()), transfers.clone());
    (engine, merchant, transfers)
}

/// Catalog with one item: price 100, quantity 5.
fn seed_widget(engine: &TestEngine, merchant: CallerId) -> ItemId {
    engine
        .add_item(merchant, "Widget", "ipfs://widget", 100, 5)
        .unwrap()
}

#[test]
fn placement_reserves_stock_and_returns_the_first_order_id() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    let order_id = engine
        .place_order(customer, vec![item], vec![3], 300)
        .unwrap();

    assert_eq!(order_id, OrderId::new(1));
    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 2);
    assert_eq!(engine.statistics(merchant).unwrap().total_sales, 300);
}

#[test]
fn active_sale_discounts_the_net_total() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);

    engine.set_discount_percentage(merchant, 10).unwrap();
    engine.toggle_sale(merchant).unwrap();

    let order_id = engine
        .place_order(CallerId::new(), vec![item], vec![2], 200)
        .unwrap();

    let order = engine.order_detail(order_id).unwrap();
    assert_eq!(order.gross_total(), 200);
    assert_eq!(order.discount(), 20);
    assert_eq!(order.net_total(), 180);

    // Toggling off stops discounting; the rate is kept.
    engine.toggle_sale(merchant).unwrap();
    let order_id = engine
        .place_order(CallerId::new(), vec![item], vec![1], 100)
        .unwrap();
    assert_eq!(engine.order_detail(order_id).unwrap().discount(), 0);
}

#[test]
fn cancellation_restores_stock_reverses_totals_and_refunds_the_net() {
    let (engine, merchant, transfers) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    engine.set_discount_percentage(merchant, 10).unwrap();
    engine.toggle_sale(merchant).unwrap();

    let order_id = engine
        .place_order(customer, vec![item], vec![3], 300)
        .unwrap();
    assert_eq!(engine.statistics(merchant).unwrap().total_sales, 270);

    engine.cancel_order(customer, order_id).unwrap();

    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 5);
    let stats = engine.statistics(merchant).unwrap();
    assert_eq!(stats.total_sales, 0);
    assert_eq!(stats.total_items_sold, 0);
    assert_eq!(stats.discounts_given, 0);
    assert_eq!(
        engine.order_detail(order_id).unwrap().status(),
        OrderStatus::Cancelled
    );

    // The refund credits the placer with the net total, not the tendered
    // amount.
    assert_eq!(
        transfers.transfers(),
        vec![Transfer {
            to: customer,
            amount: 270,
        }]
    );

    // Cancelling again finds a terminal order.
    let err = engine.cancel_order(customer, order_id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[test]
fn only_the_placer_may_cancel() {
    let (engine, merchant, transfers) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    let order_id = engine
        .place_order(customer, vec![item], vec![1], 100)
        .unwrap();

    let err = engine.cancel_order(CallerId::new(), order_id).unwrap_err();
    assert_eq!(err, StoreError::Unauthorized);
    assert!(transfers.transfers().is_empty());
    assert_eq!(
        engine.order_detail(order_id).unwrap().status(),
        OrderStatus::Accepted
    );
}

#[test]
fn status_updates_are_merchant_only_and_follow_the_chain() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();
    let order_id = engine
        .place_order(customer, vec![item], vec![1], 100)
        .unwrap();

    let err = engine
        .update_status(customer, order_id, OrderStatus::Dispatched)
        .unwrap_err();
    assert_eq!(err, StoreError::Unauthorized);

    engine
        .update_status(merchant, order_id, OrderStatus::Dispatched)
        .unwrap();

    // Once dispatched, the customer's cancellation window is closed.
    let err = engine.cancel_order(customer, order_id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));

    engine
        .update_status(merchant, order_id, OrderStatus::Delivered)
        .unwrap();
    let err = engine
        .update_status(merchant, order_id, OrderStatus::Dispatched)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[test]
fn cancelled_orders_cannot_be_advanced() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();
    let order_id = engine
        .place_order(customer, vec![item], vec![1], 100)
        .unwrap();
    engine.cancel_order(customer, order_id).unwrap();

    let err = engine
        .update_status(merchant, order_id, OrderStatus::Delivered)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidState(_)));
}

#[test]
fn failed_placement_leaves_no_trace() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let journal_before = engine.journal().len();

    let err = engine
        .place_order(CallerId::new(), vec![item], vec![6], 600)
        .unwrap_err();
    assert!(matches!(err, StoreError::InsufficientInventory { .. }));

    let err = engine
        .place_order(CallerId::new(), vec![item], vec![2], 150)
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::InsufficientPayment {
            required: 200,
            paid: 150,
        }
    );

    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 5);
    let stats = engine.statistics(merchant).unwrap();
    assert_eq!(stats.total_sales, 0);
    assert_eq!(stats.total_items_sold, 0);
    assert_eq!(engine.journal().len(), journal_before);
}

#[test]
fn merchant_only_operations_reject_other_callers() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let outsider = CallerId::new();

    assert_eq!(
        engine
            .add_item(outsider, "Gadget", "", 10, 1)
            .unwrap_err(),
        StoreError::Unauthorized
    );
    assert_eq!(
        engine.update_price(outsider, item, 50).unwrap_err(),
        StoreError::Unauthorized
    );
    assert_eq!(
        engine.increase_inventory(outsider, item, 1).unwrap_err(),
        StoreError::Unauthorized
    );
    assert_eq!(
        engine.decrease_inventory(outsider, item, 1).unwrap_err(),
        StoreError::Unauthorized
    );
    assert_eq!(engine.toggle_sale(outsider).unwrap_err(), StoreError::Unauthorized);
    assert_eq!(
        engine.set_discount_percentage(outsider, 10).unwrap_err(),
        StoreError::Unauthorized
    );
    assert_eq!(engine.withdraw_funds(outsider).unwrap_err(), StoreError::Unauthorized);
    assert_eq!(engine.statistics(outsider).unwrap_err(), StoreError::Unauthorized);
}

#[test]
fn inventory_adjustments_move_stock_and_never_underflow() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);

    engine.increase_inventory(merchant, item, 5).unwrap();
    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 10);

    engine.decrease_inventory(merchant, item, 10).unwrap();
    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 0);

    // Any further decrease is rejected outright, not clamped.
    let err = engine.decrease_inventory(merchant, item, 1).unwrap_err();
    assert!(matches!(err, StoreError::InsufficientInventory { .. }));
    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 0);
}

#[test]
fn price_updates_apply_to_future_orders_only() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    let before = engine
        .place_order(customer, vec![item], vec![1], 100)
        .unwrap();
    engine.update_price(merchant, item, 250).unwrap();
    let after = engine
        .place_order(customer, vec![item], vec![1], 250)
        .unwrap();

    // Placed orders keep the unit price snapshotted at placement.
    assert_eq!(engine.order_detail(before).unwrap().gross_total(), 100);
    assert_eq!(engine.order_detail(after).unwrap().gross_total(), 250);
}

#[test]
fn orders_are_scoped_to_their_caller() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let alice = CallerId::new();
    let bob = CallerId::new();

    let a1 = engine.place_order(alice, vec![item], vec![1], 100).unwrap();
    let b1 = engine.place_order(bob, vec![item], vec![1], 100).unwrap();
    let a2 = engine.place_order(alice, vec![item], vec![1], 100).unwrap();

    let alices: Vec<OrderId> = engine
        .orders_for_caller(alice)
        .iter()
        .map(|o| o.id_typed())
        .collect();
    assert_eq!(alices, vec![a1, a2]);

    let bobs: Vec<OrderId> = engine
        .orders_for_caller(bob)
        .iter()
        .map(|o| o.id_typed())
        .collect();
    assert_eq!(bobs, vec![b1]);

    assert!(engine.orders_for_caller(CallerId::new()).is_empty());
}

#[test]
fn shipping_addresses_are_per_caller_with_merchant_visible_snapshots() {
    let (engine, merchant, _) = setup();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    assert_eq!(engine.shipping_address(customer), None);
    engine
        .update_shipping_address(customer, "1 First St")
        .unwrap();

    let order_id = engine
        .place_order(customer, vec![item], vec![1], 100)
        .unwrap();
    engine
        .update_shipping_address(customer, "2 Second St")
        .unwrap();

    assert_eq!(
        engine.shipping_address(customer).unwrap(),
        "2 Second St".to_string()
    );
    assert_eq!(
        engine.order_shipping_address(merchant, order_id).unwrap(),
        "1 First St"
    );
    assert_eq!(
        engine
            .order_shipping_address(customer, order_id)
            .unwrap_err(),
        StoreError::Unauthorized
    );
}

#[test]
fn calculate_total_is_pure_and_shape_checked() {
    let (engine, merchant, _) = setup();
    let widget = seed_widget(&engine, merchant);
    let gadget = engine
        .add_item(merchant, "Gadget", "ipfs://gadget", 40, 2)
        .unwrap();

    assert_eq!(
        engine
            .calculate_total(&[widget, gadget], &[2, 3])
            .unwrap(),
        320
    );

    // No discount even while a sale is on.
    engine.set_discount_percentage(merchant, 50).unwrap();
    engine.toggle_sale(merchant).unwrap();
    assert_eq!(engine.calculate_total(&[widget], &[1]).unwrap(), 100);

    let err = engine.calculate_total(&[widget], &[1, 2]).unwrap_err();
    assert!(matches!(err, StoreError::MalformedInput(_)));
    let err = engine
        .calculate_total(&[ItemId::new(99)], &[1])
        .unwrap_err();
    assert_eq!(err, StoreError::NotFound);
}

#[test]
fn withdrawal_empties_the_collected_balance() {
    let (engine, merchant, transfers) = setup();
    let item = seed_widget(&engine, merchant);

    // Overpayment is retained by the store until withdrawn.
    engine
        .place_order(CallerId::new(), vec![item], vec![2], 250)
        .unwrap();

    assert_eq!(engine.withdraw_funds(merchant).unwrap(), 250);
    assert_eq!(
        transfers.transfers(),
        vec![Transfer {
            to: merchant,
            amount: 250,
        }]
    );

    // Nothing left the second time.
    assert_eq!(engine.withdraw_funds(merchant).unwrap(), 0);
}

#[test]
fn committed_events_reach_subscribers_in_commit_order() {
    let (engine, merchant, _) = setup();
    let subscription = engine.subscribe();
    let item = seed_widget(&engine, merchant);
    let customer = CallerId::new();

    engine.set_discount_percentage(merchant, 10).unwrap();
    engine.toggle_sale(merchant).unwrap();
    let order_id = engine
        .place_order(customer, vec![item], vec![2], 200)
        .unwrap();
    engine.cancel_order(customer, order_id).unwrap();
    engine.toggle_sale(merchant).unwrap();

    let mut seen = Vec::new();
    while let Ok(envelope) = subscription.try_recv() {
        seen.push(envelope);
    }

    let types: Vec<&str> = seen
        .iter()
        .map(|e| storeledger_events::Event::event_type(e.payload()))
        .collect();
    assert_eq!(
        types,
        vec![
            "catalog.item.added",
            "sale.discount_percentage_set",
            "sale.started",
            "orders.order.placed",
            "orders.order.cancelled",
            "sale.ended",
        ]
    );

    // Sequence numbers are the commit order, gapless from 1.
    let sequences: Vec<u64> = seen.iter().map(|e| e.sequence()).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);

    match seen[3].payload() {
        StoreEvent::OrderPlaced(e) => {
            assert_eq!(e.order.id_typed(), order_id);
            assert_eq!(e.order.net_total(), 180);
        }
        other => panic!("expected OrderPlaced, got {other:?}"),
    }
    match seen[4].payload() {
        StoreEvent::OrderCancelled(e) => {
            assert_eq!(e.order_id, order_id);
            assert_eq!(e.net_total, 180);
        }
        other => panic!("expected OrderCancelled, got {other:?}"),
    }
}

#[test]
fn concurrent_placements_never_oversell() {
    let (engine, merchant, _) = setup();
    let item = engine
        .add_item(merchant, "Limited", "ipfs://limited", 10, 8)
        .unwrap();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let customer = CallerId::new();
                engine.place_order(customer, vec![item], vec![1], 10).is_ok()
            })
        })
        .collect();

    let placed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|placed| *placed)
        .count();

    // Exactly the available stock was sold; the rest were rejected.
    assert_eq!(placed, 8);
    assert_eq!(engine.item_detail(item).unwrap().available_qty(), 0);
    assert_eq!(engine.statistics(merchant).unwrap().total_items_sold, 8);
}
