//! End-to-end auction flow tests.
//!
//! Drives the full stack (service -> engine -> lifecycle -> store ->
//! settlement broadcast) through the canonical marketplace scenarios:
//! increment enforcement, winner demotion, hidden-reserve settlement,
//! deadline handling, and the read-side views.

use chrono::{DateTime, TimeZone, Utc};
use mavuno_core::{
    AuctionStatus, BuyerId, FarmerId, ListingTerms, Location, ManualClock, Price, ProductId,
    Quantity, RejectionReason, SettlementOutcome,
};
use mavuno_service::{AppConfig, AuctionService, ProductSummary, StaticInventory};
use mavuno_store::{AuctionFilter, PageRequest};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn utc(d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
}

struct Harness {
    service: AuctionService,
    clock: Arc<ManualClock>,
    inventory: Arc<StaticInventory>,
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(utc(1, 10)));
    let inventory = Arc::new(StaticInventory::new());
    let service = AuctionService::new(&AppConfig::default(), clock.clone(), inventory.clone());
    Harness {
        service,
        clock,
        inventory,
    }
}

impl Harness {
    fn listed_product(&self, available: Quantity, category: &str) -> ProductId {
        let product = ProductId::new();
        self.inventory.set(
            product,
            ProductSummary {
                available_quantity: available,
                unit: "kg".to_string(),
                category: Some(category.to_string()),
            },
        );
        product
    }
}

fn standard_terms(county: &str, reserve: Option<Price>) -> ListingTerms {
    ListingTerms {
        title: "Bulk maize lot".to_string(),
        description: "Grade one, dried to 13.5%".to_string(),
        starting_price: Price::new(dec!(1000)),
        reserve_price: reserve,
        quantity: Quantity::new(dec!(10)),
        unit: "kg".to_string(),
        minimum_increment: Price::new(dec!(50)),
        location: Location::new(county, "Central"),
        start: utc(1, 9),
        end: utc(3, 9),
    }
}

/// The canonical reserve walkthrough: starting 1000, reserve 1500,
/// increment 50, quantity 10. A 1040 bid is short of the increment
/// floor; 1100 and 1200 are accepted; closing before any bid reaches
/// the reserve settles with no winner even though bids exist.
#[tokio::test]
async fn test_reserve_walkthrough_settles_no_winner() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", Some(Price::new(dec!(1500)))))
        .await
        .unwrap();
    assert_eq!(auction.status, AuctionStatus::Active);

    let mut settlements = h.service.subscribe_settlements();

    // Bid A: below the increment floor.
    let err = h
        .service
        .submit_bid(
            auction.id,
            BuyerId::new(),
            Price::new(dec!(1040)),
            Quantity::ONE,
        )
        .unwrap_err();
    assert_eq!(
        err,
        RejectionReason::BidTooLow {
            minimum: Price::new(dec!(1050)),
            baseline: Price::new(dec!(1000)),
            increment: Price::new(dec!(50)),
        }
    );
    // The message alone is enough to correct and resubmit.
    assert!(err.to_string().contains("KES 1050"));

    // Bid B: accepted and winning.
    let buyer_b = BuyerId::new();
    let bid_b = h
        .service
        .submit_bid(auction.id, buyer_b, Price::new(dec!(1100)), Quantity::new(dec!(5)))
        .unwrap();
    assert!(bid_b.is_winning);

    // Bid C: accepted, B demoted.
    let buyer_c = BuyerId::new();
    let bid_c = h
        .service
        .submit_bid(auction.id, buyer_c, Price::new(dec!(1200)), Quantity::new(dec!(10)))
        .unwrap();

    let view = h.service.get_auction(auction.id).unwrap();
    assert_eq!(view.auction.current_highest_bid, Some(Price::new(dec!(1200))));
    assert_eq!(view.auction.winning_bidder, Some(buyer_c));
    assert_eq!(view.bids.len(), 2);
    assert_eq!(view.winning_bid().unwrap().id, bid_c.id);
    assert!(!view.bids.iter().find(|b| b.id == bid_b.id).unwrap().is_winning);

    // Close before any bid reaches the reserve.
    let closed = h.service.close_auction(auction.id, farmer).unwrap();
    assert_eq!(closed.status, AuctionStatus::Closed);

    let record = settlements.try_recv().unwrap();
    assert_eq!(record.auction, auction.id);
    assert_eq!(record.outcome, SettlementOutcome::NoWinner);
}

/// The near-simultaneous walkthrough: against baseline 1100/increment
/// 50, arrival order 1150 then 1200 accepts both; the later 1200 is
/// evaluated against the new 1150 baseline and ends up winning.
#[tokio::test]
async fn test_arrival_order_walkthrough() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", None))
        .await
        .unwrap();

    // Establish the 1100 baseline.
    h.service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1100)), Quantity::ONE)
        .unwrap();

    // 1150 arrives fractionally earlier: accepted against 1100 + 50.
    let first = h
        .service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1150)), Quantity::ONE)
        .unwrap();

    // 1200 is then evaluated against the new 1150 baseline (minimum 1200).
    let second = h
        .service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1200)), Quantity::ONE)
        .unwrap();

    let view = h.service.get_auction(auction.id).unwrap();
    assert_eq!(view.bids.len(), 3);
    assert_eq!(view.auction.current_highest_bid, Some(Price::new(dec!(1200))));
    assert_eq!(view.winning_bid().unwrap().id, second.id);
    assert!(!view.bids.iter().find(|b| b.id == first.id).unwrap().is_winning);
}

/// No bid submitted after the deadline is ever recorded, even while the
/// status field still says active; the sweep then settles the
/// pre-deadline winner.
#[tokio::test]
async fn test_no_late_acceptance_and_deadline_settlement() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", None))
        .await
        .unwrap();
    let mut settlements = h.service.subscribe_settlements();

    let winner = BuyerId::new();
    h.service
        .submit_bid(auction.id, winner, Price::new(dec!(1100)), Quantity::new(dec!(10)))
        .unwrap();

    // Deadline passes; no sweep has run yet.
    h.clock.set(utc(3, 10));
    let err = h
        .service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(5000)), Quantity::ONE)
        .unwrap_err();
    assert!(matches!(err, RejectionReason::OutsideWindow { .. }));

    let report = h.service.sweep();
    assert_eq!(report.closed, 1);

    let record = settlements.try_recv().unwrap();
    match record.outcome {
        SettlementOutcome::Winner { bidder, amount, .. } => {
            assert_eq!(bidder, winner);
            assert_eq!(amount, Price::new(dec!(1100)));
        }
        SettlementOutcome::NoWinner => panic!("expected the pre-deadline winner"),
    }

    // The late bid left no trace, and a second sweep settles nothing.
    let view = h.service.get_auction(auction.id).unwrap();
    assert_eq!(view.bids.len(), 1);
    assert!(h.service.sweep().is_quiet());
    assert!(settlements.try_recv().is_err());
}

/// A bid that clears the hidden reserve settles as the winner at the
/// deadline.
#[tokio::test]
async fn test_reserve_met_settles_winner() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", Some(Price::new(dec!(1500)))))
        .await
        .unwrap();
    let mut settlements = h.service.subscribe_settlements();

    h.service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1100)), Quantity::ONE)
        .unwrap();
    let top = h
        .service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1550)), Quantity::new(dec!(8)))
        .unwrap();

    h.clock.set(utc(3, 10));
    h.service.sweep();

    let record = settlements.try_recv().unwrap();
    match record.outcome {
        SettlementOutcome::Winner {
            bid,
            amount,
            quantity,
            ..
        } => {
            assert_eq!(bid, top.id);
            assert_eq!(amount, Price::new(dec!(1550)));
            assert_eq!(quantity, Quantity::new(dec!(8)));
        }
        SettlementOutcome::NoWinner => panic!("reserve was met, expected a winner"),
    }
}

/// Cancellation stops bidding immediately and never settles.
#[tokio::test]
async fn test_cancelled_auction_rejects_bids_and_never_settles() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", None))
        .await
        .unwrap();
    let mut settlements = h.service.subscribe_settlements();

    h.service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1100)), Quantity::ONE)
        .unwrap();

    h.service.cancel_auction(auction.id, farmer).unwrap();

    let err = h
        .service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1200)), Quantity::ONE)
        .unwrap_err();
    assert_eq!(
        err,
        RejectionReason::NotActive {
            status: AuctionStatus::Cancelled
        }
    );

    // The recorded bid survives, but nothing ever settles.
    assert_eq!(h.service.get_auction(auction.id).unwrap().bids.len(), 1);
    h.clock.set(utc(3, 10));
    h.service.sweep();
    assert!(settlements.try_recv().is_err());
}

/// Listing defaults to active auctions and supports county and category
/// filters plus pagination.
#[tokio::test]
async fn test_listing_filters_and_pagination() {
    let h = harness();
    let farmer = FarmerId::new();

    let maize = h.listed_product(Quantity::new(dec!(100)), "cereals");
    let avocado = h.listed_product(Quantity::new(dec!(100)), "fruit");

    let nakuru = h
        .service
        .create_auction(farmer, maize, standard_terms("Nakuru", None))
        .await
        .unwrap();
    let kiambu = h
        .service
        .create_auction(farmer, avocado, standard_terms("Kiambu", None))
        .await
        .unwrap();

    // A draft (future window) must not show up in the default listing.
    let mut future = standard_terms("Nakuru", None);
    future.start = utc(5, 9);
    future.end = utc(7, 9);
    h.service
        .create_auction(farmer, maize, future)
        .await
        .unwrap();

    let page = h
        .service
        .list_auctions(&AuctionFilter::default(), PageRequest::default());
    assert_eq!(page.total, 2);

    let filter = AuctionFilter {
        county: Some("Nakuru".to_string()),
        ..AuctionFilter::default()
    };
    let page = h.service.list_auctions(&filter, PageRequest::default());
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, nakuru.id);

    let filter = AuctionFilter {
        category: Some("fruit".to_string()),
        ..AuctionFilter::default()
    };
    let page = h.service.list_auctions(&filter, PageRequest::default());
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, kiambu.id);

    let page = h
        .service
        .list_auctions(&AuctionFilter::default(), PageRequest::new(1, 1));
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 2);
    assert_eq!(page.pages, 2);
}

/// Farmer and buyer read models reflect ownership and bid history.
#[tokio::test]
async fn test_farmer_and_buyer_views() {
    let h = harness();
    let farmer = FarmerId::new();
    let other_farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(100)), "cereals");

    let mine = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", None))
        .await
        .unwrap();
    h.service
        .create_auction(other_farmer, product, standard_terms("Kiambu", None))
        .await
        .unwrap();

    let owned = h.service.farmer_auctions(farmer, None);
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, mine.id);
    assert!(h
        .service
        .farmer_auctions(farmer, Some(AuctionStatus::Closed))
        .is_empty());

    let buyer = BuyerId::new();
    h.service
        .submit_bid(mine.id, buyer, Price::new(dec!(1050)), Quantity::ONE)
        .unwrap();
    h.service
        .submit_bid(mine.id, BuyerId::new(), Price::new(dec!(1100)), Quantity::ONE)
        .unwrap();
    h.service
        .submit_bid(mine.id, buyer, Price::new(dec!(1150)), Quantity::ONE)
        .unwrap();

    let bids = h.service.buyer_bids(buyer);
    assert_eq!(bids.len(), 2);
    // Newest submission first.
    assert_eq!(bids[0].amount, Price::new(dec!(1150)));
    assert_eq!(bids[1].amount, Price::new(dec!(1050)));
}

/// Non-owner close attempts fail with an authorization error and leave
/// the auction biddable.
#[tokio::test]
async fn test_non_owner_close_is_rejected() {
    let h = harness();
    let farmer = FarmerId::new();
    let product = h.listed_product(Quantity::new(dec!(50)), "cereals");

    let auction = h
        .service
        .create_auction(farmer, product, standard_terms("Nakuru", None))
        .await
        .unwrap();

    let err = h
        .service
        .close_auction(auction.id, FarmerId::new())
        .unwrap_err();
    assert!(matches!(
        err,
        mavuno_service::ServiceError::Lifecycle(mavuno_lifecycle::LifecycleError::NotOwner { .. })
    ));

    // Still active and biddable.
    h.service
        .submit_bid(auction.id, BuyerId::new(), Price::new(dec!(1050)), Quantity::ONE)
        .unwrap();
}
