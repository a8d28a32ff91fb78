//! The transport-agnostic auction service facade.
//!
//! Operations map one-to-one onto the external interface the
//! surrounding marketplace binds over HTTP: create, bid, close, cancel,
//! list, detail, per-farmer and per-buyer views, and the settlement
//! subscription consumed by the order pipeline.

use crate::config::AppConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::inventory::DynInventory;
use mavuno_core::{
    Auction, AuctionId, AuctionStatus, Bid, BuyerId, FarmerId, ListingTerms, Price, ProductId,
    Quantity, RejectionReason, SettlementRecord, SharedClock,
};
use mavuno_engine::{BidEngine, BidRequest};
use mavuno_lifecycle::{LifecycleManager, SweepReport};
use mavuno_store::{AuctionFilter, AuctionStore, AuctionView, Page, PageRequest};
use std::sync::Arc;
use tokio::sync::broadcast;

/// The marketplace auction service.
pub struct AuctionService {
    store: Arc<AuctionStore>,
    engine: BidEngine,
    lifecycle: LifecycleManager,
    inventory: DynInventory,
}

impl AuctionService {
    pub fn new(config: &AppConfig, clock: SharedClock, inventory: DynInventory) -> Self {
        let store = Arc::new(AuctionStore::new());
        let engine = BidEngine::new(store.clone(), clock.clone(), config.engine);
        let lifecycle = LifecycleManager::new(store.clone(), clock);

        Self {
            store,
            engine,
            lifecycle,
            inventory,
        }
    }

    /// Create an auction for one of the farmer's products.
    ///
    /// Terms are validated before the catalog round trip; the auctioned
    /// quantity must not exceed what the catalog has on hand. The
    /// product's category (and unit, when the terms leave it blank) are
    /// stamped from the catalog summary.
    pub async fn create_auction(
        &self,
        farmer: FarmerId,
        product: ProductId,
        mut terms: ListingTerms,
    ) -> ServiceResult<Auction> {
        terms.validate()?;

        let summary = self.inventory.check(product).await?;
        if terms.quantity > summary.available_quantity {
            return Err(ServiceError::InsufficientInventory {
                requested: terms.quantity,
                available: summary.available_quantity,
            });
        }

        if terms.unit.trim().is_empty() {
            terms.unit = summary.unit.clone();
        }

        let auction = self
            .lifecycle
            .create_auction(farmer, product, terms, summary.category)?;
        Ok(auction)
    }

    /// Submit a bid. Returns the accepted bid or the typed rejection.
    pub fn submit_bid(
        &self,
        auction: AuctionId,
        bidder: BuyerId,
        amount: Price,
        quantity: Quantity,
    ) -> Result<Bid, RejectionReason> {
        self.engine.submit_bid(BidRequest {
            auction,
            bidder,
            amount,
            quantity,
        })
    }

    /// Owner-initiated close; settles immediately.
    pub fn close_auction(&self, auction: AuctionId, requester: FarmerId) -> ServiceResult<Auction> {
        Ok(self.lifecycle.close(auction, requester)?)
    }

    /// Owner-initiated cancellation; never settles.
    pub fn cancel_auction(
        &self,
        auction: AuctionId,
        requester: FarmerId,
    ) -> ServiceResult<Auction> {
        Ok(self.lifecycle.cancel(auction, requester)?)
    }

    /// Browse auctions. Read-only.
    pub fn list_auctions(&self, filter: &AuctionFilter, page: PageRequest) -> Page<Auction> {
        self.store.list(filter, page)
    }

    /// Auction detail with bids, highest first.
    pub fn get_auction(&self, auction: AuctionId) -> Option<AuctionView> {
        self.store.view(auction)
    }

    /// A farmer's own auctions, optionally filtered by status.
    pub fn farmer_auctions(&self, farmer: FarmerId, status: Option<AuctionStatus>) -> Vec<Auction> {
        self.store.by_farmer(farmer, status)
    }

    /// A buyer's accepted bids across auctions, newest first.
    pub fn buyer_bids(&self, buyer: BuyerId) -> Vec<Bid> {
        self.store.bids_by_buyer(buyer)
    }

    /// Subscribe to settlement records (the order pipeline's feed).
    pub fn subscribe_settlements(&self) -> broadcast::Receiver<SettlementRecord> {
        self.lifecycle.subscribe()
    }

    /// Run one lifecycle sweep pass.
    pub fn sweep(&self) -> SweepReport {
        self.lifecycle.sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{BoxFuture, InventoryError, InventoryProvider, ProductSummary};
    use chrono::{DateTime, TimeZone, Utc};
    use mavuno_core::{Location, ManualClock};
    use rust_decimal_macros::dec;

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    fn terms() -> ListingTerms {
        ListingTerms {
            title: "Sukuma wiki bundles".to_string(),
            description: "Morning harvest".to_string(),
            starting_price: Price::new(dec!(20)),
            reserve_price: None,
            quantity: Quantity::new(dec!(30)),
            unit: String::new(),
            minimum_increment: Price::new(dec!(5)),
            location: Location::new("Kiambu", "Limuru"),
            start: utc(1, 9),
            end: utc(2, 9),
        }
    }

    /// Inventory stub that always fails with a fixed error.
    struct FailingInventory(InventoryError);

    impl InventoryProvider for FailingInventory {
        fn check(
            &self,
            _product: ProductId,
        ) -> BoxFuture<'_, Result<ProductSummary, InventoryError>> {
            let err = self.0.clone();
            Box::pin(async move { Err(err) })
        }
    }

    fn service_with(inventory: DynInventory) -> AuctionService {
        let clock = Arc::new(ManualClock::new(utc(1, 10)));
        AuctionService::new(&AppConfig::default(), clock, inventory)
    }

    #[tokio::test]
    async fn test_create_checks_terms_before_inventory() {
        // The inventory collaborator is down, but a validation failure
        // must surface first, without any catalog round trip.
        let service = service_with(Arc::new(FailingInventory(InventoryError::Unavailable(
            "connection refused".to_string(),
        ))));

        let mut bad = terms();
        bad.title = String::new();

        let err = service
            .create_auction(FarmerId::new(), ProductId::new(), bad)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_surfaces_inventory_errors() {
        let service = service_with(Arc::new(FailingInventory(InventoryError::Unavailable(
            "connection refused".to_string(),
        ))));

        let err = service
            .create_auction(FarmerId::new(), ProductId::new(), terms())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Inventory(InventoryError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_product() {
        let service = service_with(Arc::new(crate::inventory::StaticInventory::new()));

        let err = service
            .create_auction(FarmerId::new(), ProductId::new(), terms())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Inventory(InventoryError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_enforces_available_inventory() {
        let inventory = Arc::new(crate::inventory::StaticInventory::new());
        let product = ProductId::new();
        inventory.set(
            product,
            ProductSummary {
                available_quantity: Quantity::new(dec!(10)),
                unit: "bundle".to_string(),
                category: Some("vegetables".to_string()),
            },
        );
        let service = service_with(inventory);

        // terms() asks for 30; only 10 on hand.
        let err = service
            .create_auction(FarmerId::new(), product, terms())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InsufficientInventory {
                requested: Quantity::new(dec!(30)),
                available: Quantity::new(dec!(10)),
            }
        );
    }

    #[tokio::test]
    async fn test_create_stamps_unit_and_category_from_catalog() {
        let inventory = Arc::new(crate::inventory::StaticInventory::new());
        let product = ProductId::new();
        inventory.set(
            product,
            ProductSummary {
                available_quantity: Quantity::new(dec!(100)),
                unit: "bundle".to_string(),
                category: Some("vegetables".to_string()),
            },
        );
        let service = service_with(inventory);

        let auction = service
            .create_auction(FarmerId::new(), product, terms())
            .await
            .unwrap();

        // terms() left the unit blank: the catalog's unit wins.
        assert_eq!(auction.unit, "bundle");
        assert_eq!(auction.category.as_deref(), Some("vegetables"));
    }
}
